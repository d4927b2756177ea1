use remap::prelude::*;
use std::collections::BTreeMap;
use value::Kind;

#[derive(Clone, Copy, Debug)]
pub struct ParseAwsVpcFlowLog;

impl Function for ParseAwsVpcFlowLog {
    fn identifier(&self) -> &'static str {
        "parse_aws_vpc_flow_log"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[
            Parameter {
                keyword: "value",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: true,
            },
            Parameter {
                keyword: "format",
                accepts: |v| matches!(v, Value::Bytes(_)),
                required: false,
            },
        ]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();
        let format = arguments.optional("format").map(Expr::boxed);

        Ok(Box::new(ParseAwsVpcFlowLogFn::new(value, format)))
    }
}

#[derive(Debug, Clone)]
struct ParseAwsVpcFlowLogFn {
    value: Box<dyn Expression>,
    format: Option<Box<dyn Expression>>,
}

impl ParseAwsVpcFlowLogFn {
    fn new(value: Box<dyn Expression>, format: Option<Box<dyn Expression>>) -> Self {
        Self { value, format }
    }
}

impl Expression for ParseAwsVpcFlowLogFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let bytes = self.value.execute(state, object)?.try_bytes()?;
        let input = String::from_utf8_lossy(&bytes);

        match &self.format {
            Some(expr) => {
                let bytes = expr.execute(state, object)?.try_bytes()?;
                parse_log(&input, Some(&String::from_utf8_lossy(&bytes)))
            }
            None => parse_log(&input, None),
        }
        .map_err(Into::into)
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        self.value
            .type_def(state)
            .into_fallible(true) // Log parsin_ error
            .with_inner_type(inner_type_def())
            .with_constraint(value::Kind::Map)
    }
}

/// The type defs of the fields contained by the returned map.
fn inner_type_def() -> Option<InnerTypeDef> {
    Some(inner_type_def! ({
        "version": Kind::Integer | Kind::Null,
        "account_id": Kind::Integer | Kind::Null,
        "interface_id": Kind::Bytes | Kind::Null,
        "srcaddr": Kind::Bytes | Kind::Null,
        "dstaddr": Kind::Bytes | Kind::Null,
        "srcport": Kind::Integer | Kind::Null,
        "dstport": Kind::Integer | Kind::Null,
        "protocol": Kind::Integer | Kind::Null,
        "packets": Kind::Integer | Kind::Null,
        "bytes": Kind::Integer | Kind::Null,
        "start": Kind::Integer | Kind::Null,
        "end": Kind::Integer | Kind::Null,
        "action": Kind::Bytes | Kind::Null,
        "log_status": Kind::Bytes | Kind::Null,
        "vpc_id": Kind::Bytes | Kind::Null,
        "subnet_id": Kind::Bytes | Kind::Null,
        "instance_id": Kind::Bytes | Kind::Null,
        "tcp_flags": Kind::Integer | Kind::Null,
        "type": Kind::Bytes | Kind::Null,
        "pkt_srcaddr": Kind::Bytes | Kind::Null,
        "pkt_dstaddr": Kind::Bytes | Kind::Null,
        "region": Kind::Bytes | Kind::Null,
        "az_id": Kind::Bytes | Kind::Null,
        "sublocation_type": Kind::Bytes | Kind::Null,
    }))
}

type ParseResult<T> = std::result::Result<T, String>;

fn identity<'a>(_key: &'a str, value: &'a str) -> ParseResult<&'a str> {
    Ok(value)
}

fn parse_i64(key: &str, value: &str) -> ParseResult<i64> {
    value
        .parse()
        .map_err(|_| format!("failed to parse value as i64 (key: `{}`): `{}`", key, value))
}

macro_rules! create_match {
    ($log:expr, $key:expr, $value:expr, $($name:expr => $transform:expr),+) => {
        match $key {
            $($name => {
                let value = match $value {
                    "-" => Value::Null,
                    value => $transform($name, value)?.into(),
                };
                if $log.insert($name.into(), value).is_some() {
                    return Err(format!("value already exists for key: `{}`", $key));
                }
            })+
            key => return Err(format!("unknown key: `{}`", key))
        };
    };
}

fn parse_log(input: &str, format: Option<&str>) -> ParseResult<Value> {
    let mut log = BTreeMap::new();

    let mut input = input.split(' ');
    let mut format = format
        .unwrap_or("version account_id interface_id srcaddr dstaddr srcport dstport protocol packets bytes start end action log_status")
        .split(' ');

    loop {
        return match (format.next(), input.next()) {
            (Some(key), Some(value)) => {
                create_match!(
                    log, key, value,
                    "version" => parse_i64,
                    "account_id" => parse_i64,
                    "interface_id" => identity,
                    "srcaddr" => identity,
                    "dstaddr" => identity,
                    "srcport" => parse_i64,
                    "dstport" => parse_i64,
                    "protocol" => parse_i64,
                    "packets" => parse_i64,
                    "bytes" => parse_i64,
                    "start" => parse_i64,
                    "end" => parse_i64,
                    "action" => identity,
                    "log_status" => identity,
                    "vpc_id" => identity,
                    "subnet_id" => identity,
                    "instance_id" => identity,
                    "tcp_flags" => parse_i64,
                    "type" => identity,
                    "pkt_srcaddr" => identity,
                    "pkt_dstaddr" => identity,
                    "region" => identity,
                    "az_id" => identity,
                    "sublocation_type" => identity,
                    "sublocation_id" => identity
                );

                continue;
            }
            (None, Some(value)) => Err(format!("no key for value: `{}`", value)),
            (Some(key), None) => Err(format!("no item for key: `{}`", key)),
            (None, None) => Ok(log.into()),
        };
    }
}
