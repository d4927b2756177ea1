use remap::prelude::*;
use shared::{aws_cloudwatch_logs_subscription::AwsCloudWatchLogsSubscriptionMessage, btreemap};
use value::Kind;

#[derive(Clone, Copy, Debug)]
pub struct ParseAwsCloudWatchLogSubscriptionMessage;

impl Function for ParseAwsCloudWatchLogSubscriptionMessage {
    fn identifier(&self) -> &'static str {
        "parse_aws_cloudwatch_log_subscription_message"
    }

    fn parameters(&self) -> &'static [Parameter] {
        &[Parameter {
            keyword: "value",
            accepts: |v| matches!(v, Value::Bytes(_)),
            required: true,
        }]
    }

    fn compile(&self, mut arguments: ArgumentList) -> Result<Box<dyn Expression>> {
        let value = arguments.required("value")?.boxed();

        Ok(Box::new(ParseAwsCloudWatchLogSubscriptionMessageFn {
            value,
        }))
    }
}

#[derive(Debug, Clone)]
struct ParseAwsCloudWatchLogSubscriptionMessageFn {
    value: Box<dyn Expression>,
}

impl Expression for ParseAwsCloudWatchLogSubscriptionMessageFn {
    fn execute(&self, state: &mut state::Program, object: &mut dyn Object) -> Result<Value> {
        let bytes = self.value.execute(state, object)?.try_bytes()?;

        let message = serde_json::from_slice::<AwsCloudWatchLogsSubscriptionMessage>(&bytes)
            .map_err(|e| format!("unable to parse: {}", e))?;

        Ok(btreemap! {
            "owner" => message.owner,
            "message_type" => message.message_type.as_str(),
            "log_group" => message.log_group,
            "log_stream" => message.log_stream,
            "subscription_filters" => message.subscription_filters,
            "log_events" => message.log_events.into_iter().map(|event| btreemap![
                "id" => event.id,
                "timestamp" => event.timestamp,
                "message" => event.message,
            ]).collect::<Vec<_>>(),
        }
        .into())
    }

    fn type_def(&self, state: &state::Compiler) -> TypeDef {
        self.value
            .type_def(state)
            .into_fallible(true) // Message parsing error
            .with_inner_type(inner_type_def())
            .with_constraint(value::Kind::Map)
    }
}

/// The type defs of the fields contained by the returned map.
fn inner_type_def() -> Option<InnerTypeDef> {
    Some(inner_type_def! ({
        "owner": Kind::Bytes,
        "message_type": Kind::Bytes,
        "log_group": Kind::Bytes,
        "log_stream": Kind::Bytes,
        "subscription_filters": TypeDef::from(Kind::Array)
            .with_inner_type(Some(inner_type_def!([ Kind::Bytes ]))),
        "log_events": TypeDef::from(Kind::Array)
            .with_inner_type(Some(inner_type_def! ({
                "id": Kind::Bytes,
                "timestamp": Kind::Timestamp,
                "message": Kind::Bytes,
            })))
    }))
}
