use remap::prelude::*;
use sha_2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512Trunc224, Sha512Trunc256};

const VARIANTS: &[&str] = &[
    "SHA-224",
    "SHA-256",
    "SHA-384",
    "SHA-512",
    "SHA-512/224",
    "SHA-512/256",
];

#[derive(Clone, Copy, Debug)]
pub struct Sha2;

impl Function for Sha2 {
    fn identifier(&self) -> &'static str {
        "sha2"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: true,
            },
            Parameter {
                keyword: "variant",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();
        let variant = arguments.optional_enum("variant", &VARIANTS)?;

        Ok(Box::new(Sha2Fn { value, variant }))
    }
}

#[derive(Debug, Clone)]
struct Sha2Fn {
    value: Box<dyn Expression>,
    variant: Option<String>,
}

impl Sha2Fn {
    #[cfg(test)]
    fn new(value: Box<dyn Expression>, variant: Option<&str>) -> Self {
        let variant = variant.map(|v| v.to_owned());

        Self { value, variant }
    }
}

impl Expression for Sha2Fn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let value = self.value.execute(state, object)?.try_bytes()?;

        let hash = match self.variant.as_deref() {
            Some("SHA-224") => encode::<Sha224>(&value),
            Some("SHA-256") => encode::<Sha256>(&value),
            Some("SHA-384") => encode::<Sha384>(&value),
            Some("SHA-512") => encode::<Sha512>(&value),
            Some("SHA-512/224") => encode::<Sha512Trunc224>(&value),
            Some("SHA-512/256") | None => encode::<Sha512Trunc256>(&value),
            _ => unreachable!("enum invariant"),
        };

        Ok(hash.into())
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        self.value
            .type_def(state)
            .fallible_unless(value::Kind::Bytes)
            .with_constraint(value::Kind::Bytes)
    }
}

#[inline]
fn encode<T: Digest>(value: &[u8]) -> String {
    hex::encode(T::digest(value))
}
