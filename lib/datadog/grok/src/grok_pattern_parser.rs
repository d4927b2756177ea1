use crate::ast::GrokPattern;
use crate::lexer::Lexer;
lalrpop_mod!(pub parser);

pub fn parse_grok_pattern(input: &str) -> GrokPattern {
    let lexer = Lexer::new(input);
    parser::GrokFilterParser::new().parse(input, lexer).unwrap() // TODO return Result, handle errors,
}
