mod decimal;
mod primitives;
mod temporal;

pub(crate) use decimal::{build_decimal128_array, build_decimal256_array};
pub(crate) use primitives::{
    build_binary_array, build_boolean_array, build_float32_array, build_float64_array,
    build_int8_array, build_int16_array, build_int32_array, build_int64_array, build_string_array,
    build_uint8_array, build_uint16_array, build_uint32_array, build_uint64_array,
};
pub(crate) use temporal::build_timestamp_array;
