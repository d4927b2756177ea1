use super::{
    field::Field,
    node::{ComparisonValue, QueryNode},
    vrl::{
        coalesce, make_bool, make_container_group, make_function_call, make_node, make_not,
        make_op, make_queries, make_string, make_string_comparison, make_wildcard_regex,
        make_word_regex, recurse, recurse_op,
    },
};

use vrl_parser::ast;

/// Builds a VRL expression. Building an expression means converting each leaf of a
/// `QueryNode` into an equilvalent VRL `Expr`, and tracking whether any of its sub-expressions
/// require final coalescence to a `false` value to avoid error states.
pub struct Builder {
    coalesce: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Default to not requiring coalescence, since it is an error to use it when not needed.
    pub fn new() -> Self {
        Self { coalesce: false }
    }

    /// Build a VRL expression from a `&QueryNode`. Will recurse through each leaf element
    /// as required, and coalesce the final expression to false if a fallible expression is found.
    pub fn build(mut self, node: &QueryNode) -> ast::Expr {
        let expr = recurse(self.parse_node(&node).into_iter());

        if self.coalesce {
            coalesce(expr)
        } else {
            expr
        }
    }

    /// Indicate that coalescence is required in the final expression.
    fn coalesce(&mut self) {
        self.coalesce = true;
    }

    /// Parse the provided Datadog `QueryNode`. This will return a vector of VRL expressions,
    /// in order to accommodate expansion to multiple fields where relevant.
    fn parse_node(&mut self, node: &QueryNode) -> Vec<ast::Expr> {
        match node {
            // Match everything.
            QueryNode::MatchAllDocs => vec![make_bool(true)],
            // Matching nothing.
            QueryNode::MatchNoDocs => vec![make_bool(false)],
            // Field existence.
            QueryNode::AttributeExists { attr } => make_queries(attr)
                .into_iter()
                .map(|(_, query)| make_function_call("exists", vec![query]))
                .collect(),
            QueryNode::AttributeMissing { attr } => make_queries(attr)
                .into_iter()
                .map(|(_, query)| make_not(make_function_call("exists", vec![query])))
                .collect(),
            // Equality.
            QueryNode::AttributeTerm { attr, value }
            | QueryNode::QuotedAttribute {
                attr,
                phrase: value,
            } => make_queries(attr)
                .into_iter()
                .map(|(field, query)| match field {
                    Field::Default(_) => {
                        self.coalesce();
                        make_function_call("match", vec![query, make_word_regex(&value)])
                    }
                    // Special case for tags, which should be an array.
                    Field::Reserved(f) if f == "tags" => {
                        self.coalesce();
                        make_function_call("includes", vec![query, make_string(value)])
                    }
                    _ => make_string_comparison(query, ast::Opcode::Eq, &value),
                })
                .collect(),
            // Comparison.
            QueryNode::AttributeComparison {
                attr,
                comparator,
                value,
            } => make_queries(attr)
                .into_iter()
                .map(|(_, query)| {
                    make_op(make_node(query), comparator.into(), value.clone().into())
                })
                .collect(),
            // Wildcard suffix.
            QueryNode::AttributePrefix { attr, prefix } => make_queries(attr)
                .into_iter()
                .map(|(field, query)| {
                    self.coalesce();
                    match field {
                        Field::Default(_) => make_function_call(
                            "match",
                            vec![query, make_word_regex(&format!("{}*", &prefix))],
                        ),
                        _ => make_function_call("starts_with", vec![query, make_string(prefix)]),
                    }
                })
                .collect(),
            // Arbitrary wildcard.
            QueryNode::AttributeWildcard { attr, wildcard } => make_queries(attr)
                .into_iter()
                .map(|(field, query)| {
                    self.coalesce();

                    match field {
                        // Default fields use word boundary matching.
                        Field::Default(_) => {
                            make_function_call("match", vec![query, make_word_regex(&wildcard)])
                        }
                        // If there's only one `*` and it's at the beginning, `ends_with` is faster.
                        _ if wildcard.starts_with('*') && wildcard.matches('*').count() == 1 => {
                            make_function_call(
                                "ends_with",
                                vec![query, make_string(wildcard.replace('*', ""))],
                            )
                        }
                        // Otherwise, default to non word boundary matching.
                        _ => {
                            make_function_call("match", vec![query, make_wildcard_regex(&wildcard)])
                        }
                    }
                })
                .collect(),
            // Range.
            QueryNode::AttributeRange {
                attr,
                lower,
                lower_inclusive,
                upper,
                upper_inclusive,
            } => make_queries(&attr)
                .into_iter()
                .map(|(field, query)| {
                    match (lower, upper) {
                        // If both bounds are wildcards, it'll match everything; just check the field exists.
                        (ComparisonValue::Unbounded, ComparisonValue::Unbounded) => {
                            make_function_call("exists", vec![query])
                        }
                        // Unbounded lower. Wrapped in a container group for negation compatibility.
                        (ComparisonValue::Unbounded, _) => {
                            self.coalesce();

                            let upper = match field {
                                Field::Facet(_) => upper.clone().into(),
                                _ => ComparisonValue::String(upper.to_string()).into(),
                            };

                            make_container_group(make_op(
                                make_node(query),
                                if *upper_inclusive {
                                    ast::Opcode::Le
                                } else {
                                    ast::Opcode::Lt
                                },
                                make_node(ast::Expr::Literal(make_node(upper))),
                            ))
                        }
                        // Unbounded upper. Wrapped in a container group for negation compatibility.
                        (_, ComparisonValue::Unbounded) => {
                            self.coalesce();

                            let lower = match field {
                                Field::Facet(_) => lower.clone().into(),
                                _ => ComparisonValue::String(lower.to_string()).into(),
                            };

                            make_container_group(make_op(
                                make_node(query),
                                if *lower_inclusive {
                                    ast::Opcode::Ge
                                } else {
                                    ast::Opcode::Gt
                                },
                                make_node(ast::Expr::Literal(make_node(lower))),
                            ))
                        }
                        // Definitive range.
                        _ => {
                            self.coalesce();

                            let (lower, upper) = match field {
                                Field::Facet(_) => (lower.clone().into(), upper.clone().into()),
                                _ => (
                                    ComparisonValue::String(lower.to_string()).into(),
                                    ComparisonValue::String(upper.to_string()).into(),
                                ),
                            };

                            make_container_group(make_op(
                                make_node(make_op(
                                    make_node(query.clone()),
                                    if *lower_inclusive {
                                        ast::Opcode::Ge
                                    } else {
                                        ast::Opcode::Gt
                                    },
                                    make_node(ast::Expr::Literal(make_node(lower))),
                                )),
                                ast::Opcode::And,
                                make_node(make_op(
                                    make_node(query),
                                    if *upper_inclusive {
                                        ast::Opcode::Le
                                    } else {
                                        ast::Opcode::Lt
                                    },
                                    make_node(ast::Expr::Literal(make_node(upper))),
                                )),
                            ))
                        }
                    }
                })
                .collect(),
            // Negation. If the node is an operation type, wrap in a container before negating.
            QueryNode::NegatedNode { node } => {
                let reset = self.coalesce;
                let mut expr = recurse(self.parse_node(node).into_iter());

                if self.coalesce {
                    expr = coalesce(expr);

                    // Set coalescence to its previous state.
                    self.coalesce = reset;
                }

                let node = match expr {
                    ast::Expr::Op(_) => make_container_group(expr),
                    _ => expr,
                };

                vec![make_not(node)]
            }
            // Compound.
            QueryNode::Boolean { oper, nodes } => {
                let exprs = nodes
                    .iter()
                    .map(|node| recurse(self.parse_node(node).into_iter()));

                vec![recurse_op(exprs, oper)]
            }
        }
    }
}
