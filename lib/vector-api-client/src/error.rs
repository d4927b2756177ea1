use snafu::Snafu;

/// Error types for the gRPC client
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Connection error: {}", source))]
    Connection { source: tonic::transport::Error },

    #[snafu(display("gRPC error: {}", source))]
    Grpc { source: tonic::Status },

    #[snafu(display("Invalid URL: {}", message))]
    InvalidUrl { message: String },

    #[snafu(display("Not connected to gRPC server"))]
    NotConnected,

    #[snafu(display("Stream error: {}", message))]
    Stream { message: String },
}

impl From<tonic::Status> for Error {
    fn from(source: tonic::Status) -> Self {
        Error::Grpc { source }
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(source: tonic::transport::Error) -> Self {
        Error::Connection { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
