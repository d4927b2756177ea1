use bytes::Bytes;
use remap::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct UuidV4;

impl Function for UuidV4 {
    fn identifier(&self) -> &'static str {
        "uuid_v4"
    }

    fn compile(&self, _: ArgumentList) -> Result<Box<dyn Expression>> {
        Ok(Box::new(UuidV4Fn))
    }
}

#[derive(Debug, Clone)]
struct UuidV4Fn;

impl Expression for UuidV4Fn {
    fn execute(&self, _: &mut state::Program, _: &mut dyn Object) -> Result<Value> {
        let mut buf = [0; 36];
        let uuid = uuid::Uuid::new_v4().to_hyphenated().encode_lower(&mut buf);

        Ok(Bytes::copy_from_slice(uuid.as_bytes()).into())
    }

    fn type_def(&self, _: &state::Compiler) -> TypeDef {
        TypeDef {
            kind: value::Kind::Bytes,
            ..Default::default()
        }
    }
}
