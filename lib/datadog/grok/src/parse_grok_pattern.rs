use crate::ast::GrokPattern;
use crate::lexer::Lexer;
lalrpop_mod!(pub parser);

/// Parses grok patterns as %{MATCHER:FIELD:FILTER}
pub fn parse_grok_pattern(input: &str) -> Result<GrokPattern, &str> {
    let lexer = Lexer::new(input);
    parser::GrokFilterParser::new()
        .parse(input, lexer)
        .map_err(|_| input) // just return the original string containing an error
}
