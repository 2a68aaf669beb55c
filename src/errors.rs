use thiserror::Error;

use crate::obfuscator::ObfuscationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("obfuscation error: {0}")]
    Obfuscation(#[from] ObfuscationError),
}

impl AppError {
    /// One exit code per failure class so scripted callers can tell
    /// them apart. Usage errors exit 1 before any file is touched.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Io(_) | AppError::Obfuscation(ObfuscationError::Io(_)) => 2,
            AppError::Obfuscation(ObfuscationError::Decode { .. }) => 3,
            AppError::Obfuscation(ObfuscationError::Rng(_)) => 4,
        }
    }
}
