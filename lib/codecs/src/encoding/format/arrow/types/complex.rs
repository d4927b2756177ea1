//! Complex type array builders for Arrow encoding
//!
//! This module handles nested Arrow types: List, Struct (tuples), and Map.

use arrow::array::{
    ArrayBuilder, ArrayRef, BinaryBuilder, BooleanBuilder, Float32Builder, Float64Builder,
    Int8Builder, Int16Builder, Int32Builder, Int64Builder, ListBuilder, MapBuilder, StringBuilder,
    StructBuilder, TimestampMicrosecondBuilder, TimestampMillisecondBuilder,
    TimestampNanosecondBuilder, TimestampSecondBuilder, UInt8Builder, UInt16Builder, UInt32Builder,
    UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Fields, TimeUnit};
use std::sync::Arc;

use super::super::ArrowEncodingError;
use super::create_array_builder_for_type;
use vector_core::event::{Event, Value};

/// Helper macro for downcasting builders
macro_rules! downcast_builder {
    ($builder:expr, $builder_type:ty) => {
        $builder
            .as_any_mut()
            .downcast_mut::<$builder_type>()
            .expect(concat!(
                "Failed to downcast builder to ",
                stringify!($builder_type)
            ))
    };
}

/// Helper function to serialize a Value to JSON string.
/// This is used when the schema expects a string but the data contains complex types.
fn value_to_json_string(value: &Value) -> Result<String, ArrowEncodingError> {
    serde_json::to_string(value).map_err(|e| ArrowEncodingError::Io {
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Appends a null value to an array builder based on the data type.
fn append_null_to_builder(
    builder: &mut dyn ArrayBuilder,
    data_type: &DataType,
) -> Result<(), ArrowEncodingError> {
    match data_type {
        DataType::Int8 => downcast_builder!(builder, Int8Builder).append_null(),
        DataType::Int16 => downcast_builder!(builder, Int16Builder).append_null(),
        DataType::Int32 => downcast_builder!(builder, Int32Builder).append_null(),
        DataType::Int64 => downcast_builder!(builder, Int64Builder).append_null(),
        DataType::UInt8 => downcast_builder!(builder, UInt8Builder).append_null(),
        DataType::UInt16 => downcast_builder!(builder, UInt16Builder).append_null(),
        DataType::UInt32 => downcast_builder!(builder, UInt32Builder).append_null(),
        DataType::UInt64 => downcast_builder!(builder, UInt64Builder).append_null(),
        DataType::Float32 => downcast_builder!(builder, Float32Builder).append_null(),
        DataType::Float64 => downcast_builder!(builder, Float64Builder).append_null(),
        DataType::Boolean => downcast_builder!(builder, BooleanBuilder).append_null(),
        DataType::Utf8 => downcast_builder!(builder, StringBuilder).append_null(),
        DataType::Binary => downcast_builder!(builder, BinaryBuilder).append_null(),
        DataType::Timestamp(TimeUnit::Second, _) => {
            downcast_builder!(builder, TimestampSecondBuilder).append_null()
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            downcast_builder!(builder, TimestampMillisecondBuilder).append_null()
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            downcast_builder!(builder, TimestampMicrosecondBuilder).append_null()
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            downcast_builder!(builder, TimestampNanosecondBuilder).append_null()
        }
        DataType::List(_) => {
            builder
                .as_any_mut()
                .downcast_mut::<ListBuilder<Box<dyn ArrayBuilder>>>()
                .expect("Failed to downcast to ListBuilder")
                .append_null();
        }
        DataType::Struct(_) => downcast_builder!(builder, StructBuilder).append_null(),
        DataType::Map(_, _) => {
            builder
                .as_any_mut()
                .downcast_mut::<MapBuilder<StringBuilder, Box<dyn ArrayBuilder>>>()
                .expect("Failed to downcast to MapBuilder")
                .append(false)
                .map_err(|e| ArrowEncodingError::RecordBatchCreation { source: e })?;
        }
        _ => {}
    }
    Ok(())
}

/// Recursively appends a VRL Value to an Arrow array builder.
fn append_value_to_builder(
    builder: &mut dyn ArrayBuilder,
    value: &Value,
    field: &Field,
) -> Result<(), ArrowEncodingError> {
    match (field.data_type(), value) {
        // Integer types with range checking
        (DataType::Int8, Value::Integer(i)) if *i >= i8::MIN as i64 && *i <= i8::MAX as i64 => {
            downcast_builder!(builder, Int8Builder).append_value(*i as i8);
        }
        (DataType::Int16, Value::Integer(i)) if *i >= i16::MIN as i64 && *i <= i16::MAX as i64 => {
            downcast_builder!(builder, Int16Builder).append_value(*i as i16);
        }
        (DataType::Int32, Value::Integer(i)) if *i >= i32::MIN as i64 && *i <= i32::MAX as i64 => {
            downcast_builder!(builder, Int32Builder).append_value(*i as i32);
        }
        (DataType::Int64, Value::Integer(i)) => {
            downcast_builder!(builder, Int64Builder).append_value(*i);
        }
        (DataType::UInt8, Value::Integer(i)) if *i >= 0 && *i <= u8::MAX as i64 => {
            downcast_builder!(builder, UInt8Builder).append_value(*i as u8);
        }
        (DataType::UInt16, Value::Integer(i)) if *i >= 0 && *i <= u16::MAX as i64 => {
            downcast_builder!(builder, UInt16Builder).append_value(*i as u16);
        }
        (DataType::UInt32, Value::Integer(i)) if *i >= 0 && *i <= u32::MAX as i64 => {
            downcast_builder!(builder, UInt32Builder).append_value(*i as u32);
        }
        (DataType::UInt64, Value::Integer(i)) if *i >= 0 => {
            downcast_builder!(builder, UInt64Builder).append_value(*i as u64);
        }
        // Float types
        (DataType::Float32, Value::Float(f)) => {
            downcast_builder!(builder, Float32Builder).append_value(f.into_inner() as f32);
        }
        (DataType::Float32, Value::Integer(i)) => {
            downcast_builder!(builder, Float32Builder).append_value(*i as f32);
        }
        (DataType::Float64, Value::Float(f)) => {
            downcast_builder!(builder, Float64Builder).append_value(f.into_inner());
        }
        (DataType::Float64, Value::Integer(i)) => {
            downcast_builder!(builder, Float64Builder).append_value(*i as f64);
        }
        // Boolean
        (DataType::Boolean, Value::Boolean(b)) => {
            downcast_builder!(builder, BooleanBuilder).append_value(*b);
        }
        // String types
        (DataType::Utf8, Value::Bytes(bytes)) => match std::str::from_utf8(bytes) {
            Ok(s) => downcast_builder!(builder, StringBuilder).append_value(s),
            Err(_) => {
                let s = String::from_utf8_lossy(bytes);
                downcast_builder!(builder, StringBuilder).append_value(&s)
            }
        },
        // Automatic JSON serialization: Object -> String
        (DataType::Utf8, Value::Object(obj)) => {
            let json_str = value_to_json_string(&Value::Object(obj.clone()))?;
            downcast_builder!(builder, StringBuilder).append_value(&json_str);
        }
        // Automatic JSON serialization: Array -> String
        (DataType::Utf8, Value::Array(arr)) => {
            let json_str = value_to_json_string(&Value::Array(arr.clone()))?;
            downcast_builder!(builder, StringBuilder).append_value(&json_str);
        }
        (DataType::Binary, Value::Bytes(bytes)) => {
            downcast_builder!(builder, BinaryBuilder).append_value(bytes);
        }

        // Recursive types: List (Array)
        (DataType::List(inner_field), Value::Array(arr)) => {
            let list_builder = builder
                .as_any_mut()
                .downcast_mut::<ListBuilder<Box<dyn ArrayBuilder>>>()
                .ok_or_else(|| ArrowEncodingError::UnsupportedType {
                    field_name: field.name().clone(),
                    data_type: field.data_type().clone(),
                })?;

            for item in arr.iter() {
                append_value_to_builder(list_builder.values(), item, inner_field)?;
            }
            list_builder.append(true);
        }

        // Recursive types: Struct (Tuple)
        (DataType::Struct(fields), Value::Object(obj)) => {
            let struct_builder = builder
                .as_any_mut()
                .downcast_mut::<StructBuilder>()
                .ok_or_else(|| ArrowEncodingError::UnsupportedType {
                    field_name: field.name().clone(),
                    data_type: field.data_type().clone(),
                })?;

            for (i, field) in fields.iter().enumerate() {
                let key = format!("f{}", i);
                let field_builder = &mut struct_builder.field_builders_mut()[i];
                match obj.get(key.as_str()) {
                    Some(val) => append_value_to_builder(field_builder.as_mut(), val, field)?,
                    None => append_null_to_builder(field_builder.as_mut(), field.data_type())?,
                }
            }
            struct_builder.append(true);
        }

        // Recursive types: Map (nested maps)
        (DataType::Map(entries_field, _), Value::Object(obj)) => {
            let map_builder = builder
                .as_any_mut()
                .downcast_mut::<MapBuilder<StringBuilder, Box<dyn ArrayBuilder>>>()
                .ok_or_else(|| ArrowEncodingError::UnsupportedType {
                    field_name: field.name().clone(),
                    data_type: field.data_type().clone(),
                })?;

            let DataType::Struct(entries_struct) = entries_field.data_type() else {
                return Err(ArrowEncodingError::UnsupportedType {
                    field_name: field.name().clone(),
                    data_type: field.data_type().clone(),
                });
            };

            let value_field = &entries_struct[1];
            for (key, value) in obj.iter() {
                map_builder.keys().append_value(key.as_ref());
                append_value_to_builder(map_builder.values(), value, value_field)?;
            }
            map_builder
                .append(true)
                .map_err(|e| ArrowEncodingError::RecordBatchCreation { source: e })?;
        }

        // Null/missing values
        _ => {
            if field.is_nullable() {
                append_null_to_builder(builder, field.data_type())?;
            } else {
                return Err(ArrowEncodingError::NullConstraint {
                    field_name: field.name().clone(),
                });
            }
        }
    }
    Ok(())
}

/// Builds a List array from events for a given field.
/// Handles all nested types (including List<Struct>) through recursive builder utilities.
pub(crate) fn build_list_array(
    events: &[Event],
    field_name: &str,
    inner_field: &Field,
    nullable: bool,
) -> Result<ArrayRef, ArrowEncodingError> {
    let inner_builder = create_array_builder_for_type(
        inner_field.data_type(),
        events.len() * 4, // Estimate capacity
    )?;

    let mut list_builder = ListBuilder::new(inner_builder);

    for event in events {
        if let Event::Log(log) = event {
            match log.get(field_name) {
                Some(Value::Array(arr)) => {
                    // Recursively append values (handles primitives, structs, maps, nested lists, etc.)
                    for value in arr.iter() {
                        append_value_to_builder(list_builder.values(), value, inner_field)?;
                    }
                    list_builder.append(true);
                }
                _ => {
                    if !nullable {
                        return Err(ArrowEncodingError::NullConstraint {
                            field_name: field_name.into(),
                        });
                    }
                    list_builder.append_null();
                }
            }
        }
    }

    Ok(Arc::new(list_builder.finish()))
}

/// Builds a Struct array from events for a given field (used for Tuples).
pub(crate) fn build_struct_array(
    events: &[Event],
    field_name: &str,
    fields: &Fields,
    nullable: bool,
) -> Result<ArrayRef, ArrowEncodingError> {
    // Create builders for each field
    let field_builders: Vec<Box<dyn ArrayBuilder>> = fields
        .iter()
        .map(|f| create_array_builder_for_type(f.data_type(), events.len()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut struct_builder = StructBuilder::new(fields.clone(), field_builders);

    for event in events {
        if let Event::Log(log) = event {
            match log.get(field_name) {
                Some(Value::Object(obj)) => {
                    // Tuples are represented as objects with f0, f1, f2... keys
                    let field_builders = struct_builder.field_builders_mut();
                    for (i, (field, builder)) in
                        fields.iter().zip(field_builders.iter_mut()).enumerate()
                    {
                        let key = format!("f{}", i);
                        if let Some(value) = obj.get(key.as_str()) {
                            append_value_to_builder(builder.as_mut(), value, field)?;
                        } else {
                            // If the struct field is non-nullable and the value is missing, error
                            if !field.is_nullable() {
                                return Err(ArrowEncodingError::NullConstraint {
                                    field_name: format!("{}.{}", field_name, field.name()),
                                });
                            }
                            append_null_to_builder(builder.as_mut(), field.data_type())?;
                        }
                    }
                    struct_builder.append(true);
                }
                _ => {
                    if !nullable {
                        return Err(ArrowEncodingError::NullConstraint {
                            field_name: field_name.into(),
                        });
                    }
                    // Append nulls to all field builders
                    let field_builders = struct_builder.field_builders_mut();
                    for (field, builder) in fields.iter().zip(field_builders.iter_mut()) {
                        append_null_to_builder(builder.as_mut(), field.data_type())?;
                    }
                    struct_builder.append(false);
                }
            }
        }
    }

    Ok(Arc::new(struct_builder.finish()))
}

/// Builds a Map array from events for a given field.
pub(crate) fn build_map_array(
    events: &[Event],
    field_name: &str,
    entries_field: &Field,
    nullable: bool,
) -> Result<ArrayRef, ArrowEncodingError> {
    // Extract key and value fields from entries struct
    let entries_struct = match entries_field.data_type() {
        DataType::Struct(fields) => fields,
        _ => {
            return Err(ArrowEncodingError::UnsupportedType {
                field_name: field_name.into(),
                data_type: entries_field.data_type().clone(),
            });
        }
    };

    if entries_struct.len() != 2 {
        return Err(ArrowEncodingError::UnsupportedType {
            field_name: field_name.into(),
            data_type: entries_field.data_type().clone(),
        });
    }

    let value_field = &entries_struct[1];

    // Create builders for keys and values
    let key_builder = StringBuilder::with_capacity(events.len() * 4, 0);
    let value_builder = create_array_builder_for_type(value_field.data_type(), events.len() * 4)?;

    let mut map_builder = MapBuilder::new(None, key_builder, value_builder);

    for event in events {
        if let Event::Log(log) = event {
            match log.get(field_name) {
                Some(Value::Object(obj)) => {
                    // Append each key-value pair
                    for (key, value) in obj.iter() {
                        map_builder.keys().append_value(key.as_ref());
                        append_value_to_builder(map_builder.values(), value, value_field)?;
                    }
                    map_builder
                        .append(true)
                        .map_err(|e| ArrowEncodingError::RecordBatchCreation { source: e })?;
                }
                _ => {
                    if !nullable {
                        return Err(ArrowEncodingError::NullConstraint {
                            field_name: field_name.into(),
                        });
                    }
                    // For null maps, we need to call append(false)
                    map_builder
                        .append(false)
                        .map_err(|e| ArrowEncodingError::RecordBatchCreation { source: e })?;
                }
            }
        }
    }

    Ok(Arc::new(map_builder.finish()))
}
