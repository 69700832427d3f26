use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SorterError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("transport fault: {0}")]
    TransportFault(String),
    #[error("move of {steps} positions cannot be encoded with the {encoding} encoding")]
    Unencodable { steps: u32, encoding: &'static str },
    #[error("wire byte {0:#04x} does not decode to a move")]
    InvalidWireByte(u8),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing transport")]
    MissingTransport,
    #[error("missing cup table")]
    MissingCups,
    #[error("cup table has {cups} cups but the wheel only has {slots} slots")]
    TooManyCups { cups: usize, slots: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
