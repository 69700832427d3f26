use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("i2c bus error: {0}")]
    Bus(String),
    #[error("peripheral at {channel:#04x} rejected the write")]
    Rejected { channel: u8 },
    #[error("short write to {channel:#04x}: {written} of 1 bytes")]
    ShortWrite { channel: u8, written: usize },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
