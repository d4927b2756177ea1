use remap::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct Truncate;

impl Function for Truncate {
    fn identifier(&self) -> &'static str {
        "truncate"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: true,
            },
            Parameter {
                keyword: "limit",
                accepts: |v| matches!(v, Value::Integer(_) | Value::Float(_)),
                required: true,
            },
            Parameter {
                keyword: "ellipsis",
                accepts: |v| matches!(v, Value::Boolean(_)),
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();
        let limit = arguments.required("limit")?.boxed();
        let ellipsis = arguments.optional("ellipsis").map(Expr::boxed);

        Ok(Box::new(TruncateFn {
            value,
            limit,
            ellipsis,
        }))
    }
}

#[derive(Debug, Clone)]
struct TruncateFn {
    value: Box<dyn Expression>,
    limit: Box<dyn Expression>,
    ellipsis: Option<Box<dyn Expression>>,
}

impl TruncateFn {
    #[cfg(test)]
    fn new(
        value: Box<dyn Expression>,
        limit: Box<dyn Expression>,
        ellipsis: Option<Value>,
    ) -> Self {
        let ellipsis = ellipsis.map(|b| Box::new(Literal::from(b)) as _);

        Self {
            value,
            limit,
            ellipsis,
        }
    }
}

impl Expression for TruncateFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let mut value = self
            .value
            .execute(state, object)?
            .try_bytes_utf8_lossy()?
            .into_owned();

        let limit = match self.limit.execute(state, object)? {
            Value::Float(f) => f.floor() as i64,
            Value::Integer(i) => i,
            _ => unreachable!(),
        };

        let limit = if limit < 0 { 0 } else { limit as usize };
        let ellipsis = match &self.ellipsis {
            Some(expr) => expr.execute(state, object)?.try_boolean()?,
            None => false,
        };

        let pos = if let Some((pos, chr)) = value.char_indices().take(limit).last() {
            // char_indices gives us the starting position of the character at limit,
            // we want the end position.
            pos + chr.len_utf8()
        } else {
            // We have an empty string
            0
        };

        if value.len() > pos {
            value.truncate(pos);

            if ellipsis {
                value.push_str("...");
            }
        }

        Ok(value.into())
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        use value::Kind;

        self.value
            .type_def(state)
            .fallible_unless(Kind::Bytes)
            .merge(
                self.limit
                    .type_def(state)
                    .fallible_unless(Kind::Integer | Kind::Float),
            )
            .merge_optional(
                self.ellipsis
                    .as_ref()
                    .map(|ellipsis| ellipsis.type_def(state).fallible_unless(Kind::Boolean)),
            )
            .with_constraint(Kind::Bytes)
    }
}
