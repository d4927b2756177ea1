/// Build a VRL expression from a `&QueryNode`. Will recurse through each leaf element
/// as required.
pub fn build(node: &QueryNode) -> ast::Expr {
    recurse(parse_node(&node).into_iter())
}
