use crate::{event::*, lookup::*};
use rlua::prelude::*;

impl<'a> ToLua<'a> for LogEvent {
    fn to_lua(self, ctx: LuaContext<'a>) -> LuaResult<LuaValue> {
        ctx.create_table_from(self.into_iter().map(|(k, v)| (k, v)))
            .map(LuaValue::Table)
    }
}

impl<'a> FromLua<'a> for LogEvent {
    fn from_lua(value: LuaValue<'a>, _: LuaContext<'a>) -> LuaResult<Self> {
        match value {
            LuaValue::Table(t) => {
                let mut log = LogEvent::default();
                for pair in t.pairs() {
                    let (key, value): (String, Value) = pair?;
                    let key = LookupBuf::from(key);
                    log.insert(key, value);
                }
                Ok(log)
            }
            _ => Err(rlua::Error::FromLuaConversionError {
                from: value.type_name(),
                to: "LogEvent",
                message: Some("LogEvent should ba a Lua table".to_string()),
            }),
        }
    }
}
