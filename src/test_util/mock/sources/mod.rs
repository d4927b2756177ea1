mod backpressure;
pub use self::backpressure::BackpressureSourceConfig;

mod basic;
pub use self::basic::BasicSourceConfig;

mod error;
pub use self::error::ErrorSourceConfig;

mod panic;
pub use self::panic::PanicSourceConfig;

mod tripwire;
pub use self::tripwire::TripwireSourceConfig;
