use remap::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
pub struct ParseGrok;

impl Function for ParseGrok {
    fn identifier(&self) -> &'static str {
        "parse_grok"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: true,
            },
            Parameter {
                keyword: "pattern",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: true,
            },
            Parameter {
                keyword: "remove_empty",
                accepts: |v| matches!(v, Value::Boolean(_)),
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();

        let pattern = arguments
            .required_literal("pattern")?
            .as_value()
            .clone()
            .try_bytes_utf8_lossy()?
            .into_owned();

        let mut grok = grok::Grok::with_patterns();
        let pattern = Arc::new(grok.compile(&pattern, true).map_err(|e| e.to_string())?);

        let remove_empty = arguments.optional("remove_empty").map(Expr::boxed);

        Ok(Box::new(ParseGrokFn {
            value,
            pattern,
            remove_empty,
        }))
    }
}

#[derive(Debug, Clone)]
struct ParseGrokFn {
    value: Box<dyn Expression>,
    // Wrapping pattern in an Arc, as cloning the pattern could otherwise be expensive.
    pattern: Arc<grok::Pattern>,
    remove_empty: Option<Box<dyn Expression>>,
}

impl ParseGrokFn {
    #[cfg(test)]
    fn new(
        value: Box<dyn Expression>,
        pattern: String,
        remove_empty: Option<Box<dyn Expression>>,
    ) -> Result<Self> {
        let mut grok = grok::Grok::with_patterns();
        let pattern = Arc::new(
            grok.compile(&pattern, true)
                .map_err(|e| Error::from(e.to_string()))?,
        );

        Ok(Self {
            value,
            pattern,
            remove_empty,
        })
    }
}

impl Expression for ParseGrokFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let bytes = self.value.execute(state, object)?.try_bytes()?;
        let value = String::from_utf8_lossy(&bytes);
        let remove_empty = match &self.remove_empty {
            Some(expr) => expr.execute(state, object)?.try_boolean()?,
            None => false,
        };

        match self.pattern.match_against(&value) {
            Some(matches) => {
                let mut result = BTreeMap::new();

                for (name, value) in matches.iter() {
                    if !remove_empty || !value.is_empty() {
                        result.insert(name.to_string(), Value::from(value));
                    }
                }

                Ok(Value::from(result))
            }
            None => Err("unable to parse input with grok pattern".into()),
        }
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        self.value
            .type_def(state)
            .into_fallible(true)
            .with_constraint(value::Kind::Map)
    }
}
