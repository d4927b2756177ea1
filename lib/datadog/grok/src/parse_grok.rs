use crate::{
    grok_filter::apply_filter,
    parse_grok_rules::{GrokField, GrokRule},
};
use itertools::{
    FoldWhile::{Continue, Done},
    Itertools,
};
use tracing::warn;
use vector_common::btreemap;
use vrl_compiler::{Target, Value};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("failed to apply filter '{}' to '{}'", .0, .1)]
    FailedToApplyFilter(String, String),
    #[error("value does not match any rule")]
    NoMatch,
}

/// Parses a given source field value by applying the list of grok rules until the first match found.
pub fn parse_grok(
    source_field: &str,
    grok_rules: &[GrokRule],
    remove_empty: bool,
) -> Result<Value, Error> {
    grok_rules
        .iter()
        .fold_while(Err(Error::NoMatch), |_, rule| {
            let result = apply_grok_rule(source_field, rule, remove_empty);
            if let Err(Error::NoMatch) = result {
                Continue(result)
            } else {
                Done(result)
            }
        })
        .into_inner()
}

/// Tries to parse a given string with a given grok rule.
/// Returns a result value or an error otherwise.
/// Possible errors:
/// - FailedToApplyFilter - matches the rule, but there was a runtime error while applying on of the filters
/// - NoMatch - this rule does not match a given string
fn apply_grok_rule(source: &str, grok_rule: &GrokRule, remove_empty: bool) -> Result<Value, Error> {
    let mut parsed = Value::from(btreemap! {});

    if let Some(ref matches) = grok_rule.pattern.match_against(source) {
        for (name, value) in matches.iter() {
            let mut value = Some(Value::from(value));

            if let Some(GrokField {
                lookup: field,
                filters,
            }) = grok_rule.fields.get(name)
            {
                filters.iter().for_each(|filter| {
                    if let Some(ref v) = value {
                        match apply_filter(v, filter) {
                            Ok(v) => value = Some(v),
                            Err(error) => {
                                warn!(message = "Error applying filter", field = %field, filter = %filter, %error);
                                value = None;
                            }
                        }
                    }
                });

                if let Some(value) = value {
                    match value {
                        // root-level maps must be merged
                        Value::Object(map) if field.is_root() => {
                            parsed.as_object_mut().expect("root is object").extend(map);
                        }
                        // anything else at the root leve must be ignored
                        _ if field.is_root() => {}
                        // ignore empty strings if necessary
                        Value::Bytes(b) if remove_empty && b.is_empty() => {}
                        // otherwise just apply VRL lookup insert logic
                        _ => match parsed.get(field).expect("field does not exist") {
                            Some(Value::Array(mut values)) => values.push(value),
                            Some(v) => {
                                parsed.insert(field, Value::Array(vec![v, value])).unwrap_or_else(
                                    |error| warn!(message = "Error updating field value", field = %field, %error)
                                );
                            }
                            None => {
                                parsed.insert(field, value).unwrap_or_else(
                                    |error| warn!(message = "Error updating field value", field = %field, %error)
                                );
                            }
                        },
                    };
                }
            } else {
                // this must be a regex named capturing group (?<name>group),
                // where name can only be alphanumeric - thus we do not need to parse field names(no nested fields)
                parsed
                    .as_object_mut()
                    .expect("parsed value is not an object")
                    .insert(name.to_string(), value.into());
            }
        }

        Ok(parsed)
    } else {
        Err(Error::NoMatch)
    }
}
