use crate::util::Base64Charset;
use remap::prelude::*;
use std::str::FromStr;

#[derive(Clone, Copy, Debug)]
pub struct EncodeBase64;

impl Function for EncodeBase64 {
    fn identifier(&self) -> &'static str {
        "encode_base64"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: true,
            },
            Parameter {
                keyword: "padding",
                accepts: |v| matches!(v, Value::Boolean(_)),
                required: false,
            },
            Parameter {
                keyword: "charset",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();
        let padding = arguments.optional("padding").map(Expr::boxed);
        let charset = arguments.optional("charset").map(Expr::boxed);

        Ok(Box::new(EncodeBase64Fn {
            value,
            padding,
            charset,
        }))
    }
}

#[derive(Clone, Debug)]
struct EncodeBase64Fn {
    value: Box<dyn Expression>,
    padding: Option<Box<dyn Expression>>,
    charset: Option<Box<dyn Expression>>,
}

impl Expression for EncodeBase64Fn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let value = self.value.execute(state, object)?.try_bytes()?;

        let padding = self
            .padding
            .as_ref()
            .map(|p| {
                p.execute(state, object)
                    .and_then(|v| Value::try_boolean(v).map_err(Into::into))
            })
            .transpose()?
            .unwrap_or(true);

        let charset = self
            .charset
            .as_ref()
            .map(|c| {
                c.execute(state, object)
                    .and_then(|v| Value::try_bytes(v).map_err(Into::into))
            })
            .transpose()?
            .map(|c| Base64Charset::from_str(&String::from_utf8_lossy(&c)))
            .transpose()?
            .unwrap_or_default();

        let config = base64::Config::new(charset.into(), padding);

        Ok(base64::encode_config(value, config).into())
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        use value::Kind;

        let padding_def = self
            .padding
            .as_ref()
            .map(|padding| padding.type_def(state).fallible_unless(Kind::Boolean));

        let charset_def = self
            .charset
            .as_ref()
            .map(|charset| charset.type_def(state).into_fallible(true));

        self.value
            .type_def(state)
            .fallible_unless(Kind::Bytes)
            .merge_optional(padding_def)
            .merge_optional(charset_def)
            .with_constraint(Kind::Bytes)
    }
}
