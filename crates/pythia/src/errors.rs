use thiserror::Error;

/// Every failure an engine operation or the codec can report.
///
/// A proof that does not verify is not an error: [`crate::PythiaContext::verify`]
/// reports it as `Ok(false)`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PythiaError {
    #[error("invalid buffer size: expected {expected}, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },

    #[error("malformed scalar encoding: unknown sign byte {0:#04x}")]
    MalformedScalarEncoding(u8),

    #[error("the element you are trying to decode is malformed")]
    MalformedElement,

    #[error("arithmetic fault: {0}")]
    UnderlyingArithmeticFault(String),

    #[error("pythia is not initialized")]
    NotInitialized,
}

impl PythiaError {
    pub(crate) fn arithmetic(reason: impl Into<String>) -> Self {
        Self::UnderlyingArithmeticFault(reason.into())
    }
}

impl From<rand_core::Error> for PythiaError {
    fn from(err: rand_core::Error) -> Self {
        Self::UnderlyingArithmeticFault(format!("randomness source failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, PythiaError>;
