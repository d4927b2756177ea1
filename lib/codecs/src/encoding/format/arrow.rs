//! Arrow IPC streaming format codec for batched event encoding
//!
//! Provides Apache Arrow IPC stream format encoding with static schema support.
//! This implements the streaming variant of the Arrow IPC protocol, which writes
//! a continuous stream of record batches without a file footer.

use arrow::{
    array::ArrayRef,
    compute::{CastOptions, cast_with_options},
    datatypes::{DataType, Field, Fields, Schema, SchemaRef},
    ipc::writer::StreamWriter,
    json::reader::{Decoder, ReaderBuilder},
    record_batch::RecordBatch,
};
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use snafu::Snafu;
use std::sync::Arc;
use vector_config::configurable_component;
use vector_core::event::Event;

/// Provides Arrow schema for encoding.
///
/// Sinks can implement this trait to provide custom schema fetching logic.
#[async_trait]
pub trait SchemaProvider: Send + Sync + std::fmt::Debug {
    /// Fetch the Arrow schema from the data store.
    ///
    /// This is called during sink configuration build phase to fetch
    /// the schema once at startup, rather than at runtime.
    async fn get_schema(&self) -> Result<Schema, ArrowEncodingError>;
}

/// Configuration for Arrow IPC stream serialization
#[configurable_component]
#[derive(Clone, Default)]
pub struct ArrowStreamSerializerConfig {
    /// The Arrow schema to use for encoding
    #[serde(skip)]
    #[configurable(derived)]
    pub schema: Option<arrow::datatypes::Schema>,

    /// Allow null values for non-nullable fields in the schema.
    ///
    /// When enabled, missing or incompatible values will be encoded as null even for fields
    /// marked as non-nullable in the Arrow schema. This is useful when working with downstream
    /// systems that can handle null values through defaults, computed columns, or other mechanisms.
    ///
    /// When disabled (default), missing values for non-nullable fields will cause encoding errors,
    /// ensuring all required data is present before sending to the sink.
    #[serde(default)]
    #[configurable(derived)]
    pub allow_nullable_fields: bool,
}

impl std::fmt::Debug for ArrowStreamSerializerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrowStreamSerializerConfig")
            .field(
                "schema",
                &self
                    .schema
                    .as_ref()
                    .map(|s| format!("{} fields", s.fields().len())),
            )
            .field("allow_nullable_fields", &self.allow_nullable_fields)
            .finish()
    }
}

impl ArrowStreamSerializerConfig {
    /// Create a new ArrowStreamSerializerConfig with a schema
    pub fn new(schema: arrow::datatypes::Schema) -> Self {
        Self {
            schema: Some(schema),
            allow_nullable_fields: false,
        }
    }

    /// The data type of events that are accepted by `ArrowStreamEncoder`.
    pub fn input_type(&self) -> vector_core::config::DataType {
        vector_core::config::DataType::Log
    }

    /// The schema required by the serializer.
    pub fn schema_requirement(&self) -> vector_core::schema::Requirement {
        vector_core::schema::Requirement::empty()
    }
}

/// Arrow IPC stream batch serializer that holds the schema
#[derive(Clone, Debug)]
pub struct ArrowStreamSerializer {
    schema: SchemaRef,
}

impl ArrowStreamSerializer {
    /// Create a new ArrowStreamSerializer with the given configuration
    pub fn new(config: ArrowStreamSerializerConfig) -> Result<Self, vector_common::Error> {
        let schema = config
            .schema
            .ok_or_else(|| vector_common::Error::from("Arrow serializer requires a schema."))?;

        // If allow_nullable_fields is enabled, transform the schema once here
        // instead of on every batch encoding
        let schema = if config.allow_nullable_fields {
            let nullable_fields: Fields = schema
                .fields()
                .iter()
                .map(|f| make_field_nullable(f))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| vector_common::Error::from(e.to_string()))?
                .into();
            Schema::new_with_metadata(nullable_fields, schema.metadata().clone())
        } else {
            schema
        };

        Ok(Self {
            schema: SchemaRef::new(schema),
        })
    }
}

impl tokio_util::codec::Encoder<Vec<Event>> for ArrowStreamSerializer {
    type Error = ArrowEncodingError;

    fn encode(&mut self, events: Vec<Event>, buffer: &mut BytesMut) -> Result<(), Self::Error> {
        if events.is_empty() {
            return Err(ArrowEncodingError::NoEvents);
        }

        let bytes = encode_events_to_arrow_ipc_stream(&events, Some(Arc::clone(&self.schema)))?;

        buffer.extend_from_slice(&bytes);
        Ok(())
    }
}

/// Errors that can occur during Arrow encoding
#[derive(Debug, Snafu)]
pub enum ArrowEncodingError {
    /// Failed to create Arrow record batch
    #[snafu(display("Failed to create Arrow record batch: {}", source))]
    RecordBatchCreation {
        /// The underlying Arrow error
        source: arrow::error::ArrowError,
    },

    /// Failed to write Arrow IPC data
    #[snafu(display("Failed to write Arrow IPC data: {}", source))]
    IpcWrite {
        /// The underlying Arrow error
        source: arrow::error::ArrowError,
    },

    /// No events provided for encoding
    #[snafu(display("No events provided for encoding"))]
    NoEvents,

    /// Schema must be provided before encoding
    #[snafu(display("Schema must be provided before encoding"))]
    NoSchemaProvided,

    /// Failed to fetch schema from provider
    #[snafu(display("Failed to fetch schema from provider: {}", message))]
    SchemaFetchError {
        /// Error message from the provider
        message: String,
    },

    /// Null value encountered for non-nullable field
    #[snafu(display("Null value for non-nullable field '{}'", field_name))]
    NullConstraint {
        /// The field name
        field_name: String,
    },

    /// IO error during encoding
    #[snafu(display("IO error: {}", source))]
    Io {
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Arrow JSON decoding error
    #[snafu(display("Arrow JSON decoding error: {}", source))]
    ArrowJsonDecode {
        /// The underlying Arrow error
        source: arrow::error::ArrowError,
    },

    /// Invalid Map schema structure
    #[snafu(display("Invalid Map schema for field '{}': {}", field_name, reason))]
    InvalidMapSchema {
        /// The field name
        field_name: String,
        /// Description of the schema violation
        reason: String,
    },
}

impl From<std::io::Error> for ArrowEncodingError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error }
    }
}

/// Encodes a batch of events into Arrow IPC streaming format
pub fn encode_events_to_arrow_ipc_stream(
    events: &[Event],
    schema: Option<SchemaRef>,
) -> Result<Bytes, ArrowEncodingError> {
    if events.is_empty() {
        return Err(ArrowEncodingError::NoEvents);
    }

    let schema_ref = schema.ok_or(ArrowEncodingError::NoSchemaProvided)?;

    let record_batch = build_record_batch(schema_ref, events)?;

    let ipc_err = |source| ArrowEncodingError::IpcWrite { source };

    let mut buffer = BytesMut::new().writer();
    let mut writer =
        StreamWriter::try_new(&mut buffer, record_batch.schema_ref()).map_err(ipc_err)?;
    writer.write(&record_batch).map_err(ipc_err)?;
    writer.finish().map_err(ipc_err)?;

    Ok(buffer.into_inner().freeze())
}

/// Recursively makes a Field and all its nested fields nullable
fn make_field_nullable(field: &Field) -> Result<Field, ArrowEncodingError> {
    let new_data_type = match field.data_type() {
        DataType::List(inner_field) => DataType::List(make_field_nullable(inner_field)?.into()),
        DataType::Struct(fields) => DataType::Struct(
            fields
                .iter()
                .map(|f| make_field_nullable(f))
                .collect::<Result<Vec<_>, _>>()?
                .into(),
        ),
        DataType::Map(inner, sorted) => {
            // A Map's inner field is a "entries" Struct<Key, Value>
            let DataType::Struct(fields) = inner.data_type() else {
                return Err(ArrowEncodingError::InvalidMapSchema {
                    field_name: field.name().to_string(),
                    reason: format!("inner type must be Struct, found {:?}", inner.data_type()),
                });
            };

            if fields.len() != 2 {
                return Err(ArrowEncodingError::InvalidMapSchema {
                    field_name: field.name().to_string(),
                    reason: format!("expected 2 fields (key, value), found {}", fields.len()),
                });
            }
            let key_field = &fields[0];
            let value_field = &fields[1];

            let new_struct_fields: Fields =
                [key_field.clone(), make_field_nullable(value_field)?.into()].into();

            // Reconstruct the inner "entries" field
            // The inner field itself must be non-nullable (only the Map wrapper is nullable)
            let new_inner_field = inner
                .as_ref()
                .clone()
                .with_data_type(DataType::Struct(new_struct_fields))
                .with_nullable(false);

            DataType::Map(new_inner_field.into(), *sorted)
        }
        other => other.clone(),
    };

    Ok(field
        .clone()
        .with_data_type(new_data_type)
        .with_nullable(true))
}

/// Build a decoder schema: swap Binary fields to Utf8 so arrow-json can decode
/// Vector's UTF-8 serialized bytes (arrow-json expects hex-encoded strings for Binary).
fn build_decoder_schema(schema: &Schema) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| match f.data_type() {
            DataType::Binary => f.as_ref().clone().with_data_type(DataType::Utf8),
            _ => f.as_ref().clone(),
        })
        .collect();
    Schema::new_with_metadata(Fields::from(fields), schema.metadata().clone())
}

/// Build an Arrow RecordBatch from a slice of events using the provided schema.
fn build_record_batch(
    schema: SchemaRef,
    events: &[Event],
) -> Result<RecordBatch, ArrowEncodingError> {
    // Pre-validate non-nullable fields (arrow-json silently writes defaults for missing fields)
    validate_non_nullable_fields(events, &schema)?;

    let decoder_schema = build_decoder_schema(&schema);
    let decoder = ReaderBuilder::new(Arc::new(decoder_schema))
        .build_decoder()
        .map_err(|source| ArrowEncodingError::RecordBatchCreation { source })?;

    let batch = decode_events(decoder, events)?;

    // Post-process: cast columns that were swapped for decoder compatibility
    let columns: Result<Vec<ArrayRef>, _> = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(col, field)| {
            if col.data_type() == field.data_type() {
                Ok(col.clone())
            } else {
                cast_with_options(col, field.data_type(), &CastOptions::default())
                    .map_err(|source| ArrowEncodingError::RecordBatchCreation { source })
            }
        })
        .collect();

    RecordBatch::try_new(schema, columns?)
        .map_err(|source| ArrowEncodingError::RecordBatchCreation { source })
}

/// Validate that non-nullable fields are present in all events.
fn validate_non_nullable_fields(
    events: &[Event],
    schema: &SchemaRef,
) -> Result<(), ArrowEncodingError> {
    let required_fields: Vec<&str> = schema
        .fields()
        .iter()
        .filter(|f| !f.is_nullable())
        .map(|f| f.name().as_str())
        .collect();

    for name in required_fields {
        if events
            .iter()
            .filter_map(Event::maybe_as_log)
            .any(|log| log.get(lookup::event_path!(name)).is_none())
        {
            return Err(ArrowEncodingError::NullConstraint {
                field_name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Serialize events as JSON and decode them into a RecordBatch using the arrow-json Decoder.
fn decode_events(
    mut decoder: Decoder,
    events: &[Event],
) -> Result<RecordBatch, ArrowEncodingError> {
    let values: Vec<&vrl::value::Value> = events
        .iter()
        .filter_map(Event::maybe_as_log)
        .map(|log| log.value())
        .collect();

    decoder
        .serialize(&values)
        .map_err(|source| ArrowEncodingError::ArrowJsonDecode { source })?;

    decoder
        .flush()
        .map_err(|source| ArrowEncodingError::ArrowJsonDecode { source })?
        .ok_or(ArrowEncodingError::NoEvents)
}
