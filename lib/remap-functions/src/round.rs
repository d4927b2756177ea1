use crate::util::round_to_precision;
use remap::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct Round;

impl Function for Round {
    fn identifier(&self) -> &'static str {
        "round"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| matches!(v, Value::Float(_) | Value::Integer(_)),
                required: true,
            },
            Parameter {
                keyword: "precision",
                accepts: |v| matches!(v, Value::Integer(_)),
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();
        let precision = arguments.optional("precision").map(Expr::boxed);

        Ok(Box::new(RoundFn { value, precision }))
    }
}

#[derive(Debug, Clone)]
struct RoundFn {
    value: Box<dyn Expression>,
    precision: Option<Box<dyn Expression>>,
}

impl RoundFn {
    #[cfg(test)]
    fn new(value: Box<dyn Expression>, precision: Option<Box<dyn Expression>>) -> Self {
        Self { value, precision }
    }
}

impl Expression for RoundFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let precision = match &self.precision {
            Some(expr) => expr.execute(state, object)?.try_integer()?,
            None => 0,
        };

        match self.value.execute(state, object)? {
            Value::Float(f) => Ok(round_to_precision(f, precision, f64::round).into()),
            v @ Value::Integer(_) => Ok(v),
            _ => unreachable!(),
        }
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        use value::Kind;

        let value_def = self
            .value
            .type_def(state)
            .fallible_unless(Kind::Integer | Kind::Float);
        let precision_def = self
            .precision
            .as_ref()
            .map(|precision| precision.type_def(state).fallible_unless(Kind::Integer));

        value_def
            .clone()
            .merge_optional(precision_def)
            .with_constraint(match value_def.kind {
                v if v.is_float() || v.is_integer() => v,
                _ => Kind::Integer | Kind::Float,
            })
    }
}
