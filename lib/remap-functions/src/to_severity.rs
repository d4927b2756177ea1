use remap::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct ToSeverity;

impl Function for ToSeverity {
    fn identifier(&self) -> &'static str {
        "to_severity"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[Parameter {
            keyword: "level",
            accepts: |v| matches!(v, Value::Bytes(_)),
            required: true,
        }]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let level = arguments.required("level")?.boxed();

        Ok(Box::new(ToSeverityFn { level }))
    }
}

#[derive(Debug, Clone)]
struct ToSeverityFn {
    level: Box<dyn Expression>,
}

impl Expression for ToSeverityFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let level_bytes = self.level.execute(state, object)?.try_bytes()?;

        let level = String::from_utf8_lossy(&level_bytes);

        // Severity levels: https://en.wikipedia.org/wiki/Syslog#Severity_level
        let severity = match &level[..] {
            "emerg" | "panic" => Ok(0),
            "alert" => Ok(1),
            "crit" => Ok(2),
            "err" | "error" => Ok(3),
            "warning" | "warn" => Ok(4),
            "notice" => Ok(5),
            "info" => Ok(6),
            "debug" => Ok(7),
            _ => Err(format!("level {} not valid", level)),
        };

        match severity {
            Ok(severity) => Ok(Value::from(severity)),
            Err(e) => Err(Error::Call(e)),
        }
    }

    fn type_def(&self, _: &state::Compiler) -> TypeDef {
        TypeDef {
            kind: value::Kind::Integer,
            ..Default::default()
        }
    }
}
