use crate::{
    state, type_def::InnerTypeDef, value, Expr, Expression, Object, Result, TypeDef, Value,
};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, PartialEq)]
pub struct Map {
    expressions: BTreeMap<String, Expr>,
}

impl Map {
    pub fn new(expressions: BTreeMap<String, Expr>) -> Self {
        Self { expressions }
    }

    pub fn boxed(self) -> Box<dyn Expression> {
        Box::new(self)
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expressions.fmt(f)
    }
}

impl From<Map> for BTreeMap<String, Expr> {
    fn from(map: Map) -> Self {
        map.expressions
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Map {
    fn from(values: BTreeMap<String, T>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|(k, v)| (k, Expr::from(v)))
                .collect::<BTreeMap<_, _>>(),
        )
    }
}

impl IntoIterator for Map {
    type Item = (String, Expr);
    type IntoIter = std::collections::btree_map::IntoIter<String, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.expressions.into_iter()
    }
}

impl Expression for Map {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        self.expressions
            .iter()
            .map(|(key, expr)| expr.execute(state, object).map(|v| (key.clone(), v)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Value::Map)
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        let fallible = self
            .expressions
            .iter()
            .map(|(_, e)| e.type_def(state))
            .any(|d| d.is_fallible());

        let inner_type_def = if self.expressions.is_empty() {
            None
        } else {
            Some(InnerTypeDef::Map(
                self.expressions
                    .iter()
                    .map(|(name, expression)| (name.clone(), expression.type_def(state)))
                    .collect(),
            ))
        };

        TypeDef {
            fallible,
            kind: value::Kind::Map,
            inner_type_def,
        }
    }
}
