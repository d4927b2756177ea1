use bytes::Bytes;
use ordered_float::NotNan;
use tracing::warn;
use vector_core::event::metric::TagValue;
use vrl::value::{ObjectMap, Value};

use super::proto::common::v1::{
    AnyValue, ArrayValue, KeyValue, KeyValueList, any_value::Value as PBValue,
};

impl From<PBValue> for Value {
    fn from(av: PBValue) -> Self {
        match av {
            PBValue::StringValue(v) => Value::Bytes(Bytes::from(v)),
            PBValue::BoolValue(v) => Value::Boolean(v),
            PBValue::IntValue(v) => Value::Integer(v),
            PBValue::DoubleValue(v) => NotNan::new(v).map(Value::Float).unwrap_or(Value::Null),
            PBValue::BytesValue(v) => Value::Bytes(Bytes::from(v)),
            PBValue::ArrayValue(arr) => Value::Array(
                arr.values
                    .into_iter()
                    .map(|av| av.value.map(Into::into).unwrap_or(Value::Null))
                    .collect::<Vec<Value>>(),
            ),
            PBValue::KvlistValue(arr) => kv_list_into_value(arr.values),
        }
    }
}

impl From<PBValue> for TagValue {
    fn from(pb: PBValue) -> Self {
        match pb {
            PBValue::StringValue(s) => TagValue::from(s),
            PBValue::BoolValue(b) => TagValue::from(b.to_string()),
            PBValue::IntValue(i) => TagValue::from(i.to_string()),
            PBValue::DoubleValue(f) => TagValue::from(f.to_string()),
            PBValue::BytesValue(b) => TagValue::from(String::from_utf8_lossy(&b).to_string()),
            _ => TagValue::from("null"),
        }
    }
}

pub fn kv_list_into_value(arr: Vec<KeyValue>) -> Value {
    Value::Object(
        arr.into_iter()
            .filter_map(|kv| {
                kv.value.map(|av| {
                    (
                        kv.key.into(),
                        av.value.map(Into::into).unwrap_or(Value::Null),
                    )
                })
            })
            .collect::<ObjectMap>(),
    )
}

pub fn to_hex(d: &[u8]) -> String {
    if d.is_empty() {
        return "".to_string();
    }
    hex::encode(d)
}

// ============================================================================
// Inverse converters: Value → PBValue (for encoding native logs to OTLP)
// ============================================================================

/// Convert a Vector Value to an OTLP PBValue.
/// This is the inverse of the existing `From<PBValue> for Value` implementation.
impl From<Value> for PBValue {
    fn from(v: Value) -> Self {
        match v {
            // Mirrors: PBValue::StringValue(v) => Value::Bytes(Bytes::from(v))
            // Optimization: Try valid UTF-8 first to avoid allocation
            Value::Bytes(b) => PBValue::StringValue(
                String::from_utf8(b.to_vec()).unwrap_or_else(|e| {
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }),
            ),

            // Mirrors: PBValue::BoolValue(v) => Value::Boolean(v)
            Value::Boolean(b) => PBValue::BoolValue(b),

            // Mirrors: PBValue::IntValue(v) => Value::Integer(v)
            Value::Integer(i) => PBValue::IntValue(i),

            // Mirrors: PBValue::DoubleValue(v) => NotNan::new(v).map(Value::Float)...
            Value::Float(f) => PBValue::DoubleValue(f.into_inner()),

            // Mirrors: PBValue::ArrayValue(arr) => Value::Array(...)
            Value::Array(arr) => {
                let mut values = Vec::with_capacity(arr.len());
                for v in arr {
                    values.push(AnyValue {
                        value: Some(v.into()),
                    });
                }
                PBValue::ArrayValue(ArrayValue { values })
            }

            // Mirrors: PBValue::KvlistValue(arr) => kv_list_into_value(arr.values)
            Value::Object(obj) => PBValue::KvlistValue(KeyValueList {
                values: value_object_to_kv_list(obj),
            }),

            // Types without direct OTLP equivalent - convert to string representation
            Value::Timestamp(ts) => PBValue::StringValue(ts.to_rfc3339()),
            Value::Null => PBValue::StringValue(String::new()),
            Value::Regex(r) => PBValue::StringValue(r.to_string()),
        }
    }
}

/// Convert a Vector ObjectMap to a Vec<KeyValue> for OTLP.
/// This is the inverse of `kv_list_into_value`.
#[inline]
pub fn value_object_to_kv_list(obj: ObjectMap) -> Vec<KeyValue> {
    // Pre-allocate based on input size (some may be filtered)
    let mut result = Vec::with_capacity(obj.len());
    for (k, v) in obj {
        // Skip null values (OTLP doesn't represent them well)
        if matches!(v, Value::Null) {
            continue;
        }
        result.push(KeyValue {
            key: k.into(),
            value: Some(AnyValue {
                value: Some(v.into()),
            }),
        });
    }
    result
}

/// Convert a hex string to bytes.
/// This is the inverse of `to_hex`.
/// Handles various input formats gracefully (with/without 0x prefix, whitespace).
#[inline]
pub fn from_hex(s: &str) -> Vec<u8> {
    if s.is_empty() {
        return Vec::new();
    }
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    // hex::decode already pre-allocates correctly
    hex::decode(s).unwrap_or_else(|e| {
        warn!(message = "Invalid hex string, using empty bytes", input = %s, error = %e);
        Vec::new()
    })
}

/// Validate trace_id bytes and return valid 16-byte trace_id or empty.
/// Handles common mistakes like hex strings passed as bytes.
/// Returns owned Vec to allow caller to use directly in protobuf message.
#[inline]
pub fn validate_trace_id(bytes: &[u8]) -> Vec<u8> {
    match bytes.len() {
        0 => Vec::new(),
        16 => bytes.to_vec(),
        32 => {
            // Auto-fix: hex string passed as bytes (common mistake)
            // Try direct hex decode from bytes to avoid UTF-8 conversion
            if bytes.iter().all(|b| b.is_ascii_hexdigit()) {
                // Safe: all bytes are ASCII hex digits
                let s = unsafe { std::str::from_utf8_unchecked(bytes) };
                from_hex(s)
            } else {
                warn!(message = "trace_id appears to be hex string but contains invalid chars");
                Vec::new()
            }
        }
        _ => {
            warn!(
                message = "Invalid trace_id length, clearing",
                length = bytes.len()
            );
            Vec::new()
        }
    }
}

/// Validate span_id bytes and return valid 8-byte span_id or empty.
/// Handles common mistakes like hex strings passed as bytes.
#[inline]
pub fn validate_span_id(bytes: &[u8]) -> Vec<u8> {
    match bytes.len() {
        0 => Vec::new(),
        8 => bytes.to_vec(),
        16 => {
            // Auto-fix: hex string passed as bytes (common mistake)
            // Try direct hex decode from bytes to avoid UTF-8 conversion
            if bytes.iter().all(|b| b.is_ascii_hexdigit()) {
                // Safe: all bytes are ASCII hex digits
                let s = unsafe { std::str::from_utf8_unchecked(bytes) };
                from_hex(s)
            } else {
                warn!(message = "span_id appears to be hex string but contains invalid chars");
                Vec::new()
            }
        }
        _ => {
            warn!(
                message = "Invalid span_id length, clearing",
                length = bytes.len()
            );
            Vec::new()
        }
    }
}
