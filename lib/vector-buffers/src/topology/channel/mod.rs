mod limited_queue;
mod receiver;
mod sender;

pub use limited_queue::{
    ChannelMetricMetadata, DEFAULT_EWMA_ALPHA, LimitedReceiver, LimitedSender, SendError, limited,
};
pub use receiver::*;
pub use sender::*;
