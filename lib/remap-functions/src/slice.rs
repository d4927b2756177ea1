use remap::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct Slice;

impl Function for Slice {
    fn identifier(&self) -> &'static str {
        "slice"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| matches!(v, Value::Bytes(_) | Value::Array(_)),
                required: true,
            },
            Parameter {
                keyword: "start",
                accepts: |v| matches!(v, Value::Integer(_)),
                required: true,
            },
            Parameter {
                keyword: "end",
                accepts: |v| matches!(v, Value::Integer(_)),
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();
        let start = arguments.required("start")?.boxed();
        let end = arguments.optional("end").map(Expr::boxed);

        Ok(Box::new(SliceFn { value, start, end }))
    }
}

#[derive(Debug, Clone)]
struct SliceFn {
    value: Box<dyn Expression>,
    start: Box<dyn Expression>,
    end: Option<Box<dyn Expression>>,
}

impl SliceFn {
    #[cfg(test)]
    fn new(value: Box<dyn Expression>, start: isize, end: Option<isize>) -> Self {
        let start = Box::new(Literal::from(start as i64));
        let end = end.map(|i| Box::new(Literal::from(i as i64)) as _);

        Self { value, start, end }
    }
}

impl Expression for SliceFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let start = self.start.execute(state, object)?.try_integer()?;
        let end = match &self.end {
            Some(expr) => Some(expr.execute(state, object)?.try_integer()?),
            None => None,
        };

        let range = |len: i64| -> Result<std::ops::Range<usize>> {
            let start = match start {
                start if start < 0 => start + len,
                start => start,
            };

            let end = match end {
                Some(end) if end < 0 => end + len,
                Some(end) => end,
                None => len,
            };

            match () {
                _ if start < 0 || start > len => {
                    Err(format!(r#""start" must be between "{}" and "{}""#, -len, len).into())
                }
                _ if end < start => Err(r#""end" must be greater or equal to "start""#.into()),
                _ if end > len => Ok(start as usize..len as usize),
                _ => Ok(start as usize..end as usize),
            }
        };

        match self.value.execute(state, object)? {
            Value::Bytes(v) => range(v.len() as i64)
                .map(|range| v.slice(range))
                .map(Value::from),
            Value::Array(mut v) => range(v.len() as i64)
                .map(|range| v.drain(range).collect::<Vec<_>>())
                .map(Value::from),
            _ => unreachable!(),
        }
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        use value::Kind;

        let value_def = self
            .value
            .type_def(state)
            .fallible_unless(Kind::Bytes | Kind::Array);
        let end_def = self
            .end
            .as_ref()
            .map(|end| end.type_def(state).fallible_unless(Kind::Integer));

        value_def
            .clone()
            .merge(self.start.type_def(state).fallible_unless(Kind::Integer))
            .merge_optional(end_def)
            .with_constraint(match value_def.kind {
                v if v.is_bytes() || v.is_array() => v,
                _ => Kind::Bytes | Kind::Array,
            })
            .into_fallible(true) // can fail for invalid start..end ranges
    }
}
