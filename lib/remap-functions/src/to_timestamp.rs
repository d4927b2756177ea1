use chrono::{TimeZone, Utc};
use remap::prelude::*;
use shared::conversion::Conversion;

#[derive(Clone, Copy, Debug)]
pub struct ToTimestamp;

impl Function for ToTimestamp {
    fn identifier(&self) -> &'static str {
        "to_timestamp"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| {
                    matches!(
                        v,
                        Value::Integer(_) |
                        Value::Float(_) |
                        Value::Bytes(_) |
                        Value::Timestamp(_)
                    )
                },
                required: true,
            },
            Parameter {
                keyword: "default",
                accepts: |v| {
                    matches!(
                        v,
                        Value::Integer(_) |
                        Value::Float(_) |
                        Value::Bytes(_) |
                        Value::Timestamp(_)
                    )
                },
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();
        let default = arguments.optional("default").map(Expr::boxed);

        Ok(Box::new(ToTimestampFn { value, default }))
    }
}

#[derive(Debug, Clone)]
struct ToTimestampFn {
    value: Box<dyn Expression>,
    default: Option<Box<dyn Expression>>,
}

impl ToTimestampFn {
    #[cfg(test)]
    fn new(value: Box<dyn Expression>, default: Option<Value>) -> Self {
        let default = default.map(|v| Box::new(Literal::from(v)) as _);
        Self { value, default }
    }
}

impl Expression for ToTimestampFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        use Value::*;

        let to_timestamp = |value| match value {
            Timestamp(_) => Ok(value),
            Integer(v) => Ok(Timestamp(Utc.timestamp(v, 0))),
            Float(v) => Ok(Timestamp(Utc.timestamp(v.round() as i64, 0))),
            Bytes(v) => Conversion::Timestamp
                .convert(v)
                .map_err(|e| e.to_string().into()),
            Boolean(_) | Array(_) | Map(_) | Regex(_) | Null => {
                Err("unable to convert value to timestamp".into())
            }
        };

        crate::util::convert_value_or_default(
            self.value.execute(state, object),
            self.default.as_ref().map(|v| v.execute(state, object)),
            to_timestamp,
        )
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        use value::Kind;

        self.value
            .type_def(state)
            .fallible_unless(Kind::Timestamp | Kind::Integer | Kind::Float)
            .merge_with_default_optional(self.default.as_ref().map(|default| {
                default
                    .type_def(state)
                    .fallible_unless(Kind::Timestamp | Kind::Integer | Kind::Float)
            }))
            .with_constraint(Kind::Timestamp)
    }
}
