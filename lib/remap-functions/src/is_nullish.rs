use remap::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct IsNullish;

impl Function for IsNullish {
    fn identifier(&self) -> &'static str {
        "is_nullish"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[Parameter {
            keyword: "value",
            accepts: |v| matches!(v, Value::Bytes(_) | Value::Null),
            required: true,
        }]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();

        Ok(Box::new(IsNullishFn { value }))
    }
}

#[derive(Clone, Debug)]
struct IsNullishFn {
    value: Box<dyn Expression>,
}

impl Expression for IsNullishFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        match self.value.execute(state, object)? {
            Value::Bytes(v) => {
                let s = &String::from_utf8_lossy(&v)[..];

                match s {
                    "-" => Ok(true.into()),
                    _ => {
                        let has_whitespace = s.chars().all(char::is_whitespace);
                        Ok(has_whitespace.into())
                    }
                }
            }
            Value::Null => Ok(true.into()),
            _ => Ok(false.into()),
        }
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        use value::Kind;

        self.value
            .type_def(state)
            .into_fallible(false)
            .with_constraint(Kind::Boolean)
    }
}
