use remap::prelude::*;
use sha_3::{Digest, Sha3_224, Sha3_256, Sha3_384, Sha3_512};

const VARIANTS: &[&str] = &["SHA3-224", "SHA3-256", "SHA3-384", "SHA3-512"];

#[derive(Clone, Copy, Debug)]
pub struct Sha3;

impl Function for Sha3 {
    fn identifier(&self) -> &'static str {
        "sha3"
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

        Ok(Box::new(Sha3Fn { value, variant }))
    }
}

#[derive(Debug, Clone)]
struct Sha3Fn {
    value: Box<dyn Expression>,
    variant: Option<String>,
}

impl Sha3Fn {
    #[cfg(test)]
    fn new(value: Box<dyn Expression>, variant: Option<&str>) -> Self {
        let variant = variant.map(|v| v.to_owned());

        Self { value, variant }
    }
}

impl Expression for Sha3Fn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let value = self.value.execute(state, object)?.try_bytes()?;

        let hash = match self.variant.as_deref() {
            Some("SHA3-224") => encode::<Sha3_224>(&value),
            Some("SHA3-256") => encode::<Sha3_256>(&value),
            Some("SHA3-384") => encode::<Sha3_384>(&value),
            Some("SHA3-512") | None => encode::<Sha3_512>(&value),
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
