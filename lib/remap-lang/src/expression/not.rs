use crate::{state, value, Expr, Expression, Object, Result, TypeDef, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Not {
    expression: Box<Expr>,
}

impl Not {
    pub fn new(expression: Box<Expr>) -> Self {
        Self { expression }
    }
}

impl Expression for Not {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let boolean = self.expression.execute(state, object)?.try_boolean()?;

        Ok((!boolean).into())
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        self.expression
            .type_def(state)
            .fallible_unless(value::Kind::Boolean)
            .with_constraint(value::Kind::Boolean)
    }
}
