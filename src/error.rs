// src/error.rs
//
// Error types shared by the analysis core, the decoder and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the analysis core.
///
/// Degenerate numeric situations (silence, too-short input) are not errors:
/// each analyzer absorbs them with a defined fallback value.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Empty buffer, zero sample rate or non-finite samples.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Unexpected internal failure (transform size mismatch and the like).
    #[error("analysis failed: {message}")]
    AnalysisFailure { message: String },
}

impl AnalysisError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::AnalysisFailure {
            message: message.into(),
        }
    }
}

impl From<realfft::FftError> for AnalysisError {
    fn from(err: realfft::FftError) -> Self {
        Self::failure(format!("real FFT: {}", err))
    }
}

/// Errors raised while turning an audio file into samples.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported or corrupted audio format: {0}")]
    Unsupported(String),

    #[error("no supported audio track found")]
    NoTrack,

    #[error("file does not specify a sample rate")]
    MissingSampleRate,

    #[error("file reports 0 audio channels")]
    NoChannels,

    #[error("no audio samples decoded")]
    Empty,

    #[error("decoding failed: {0}")]
    Codec(#[from] symphonia::core::errors::Error),
}

/// Errors raised while loading or validating an analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },
}

impl ConfigError {
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Failure of a whole-file run: decode and analysis errors stay distinguishable.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::invalid_input("empty signal");
        assert_eq!(err.to_string(), "invalid input: empty signal");

        let err = ConfigError::invalid_param("fft_size", "must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'fft_size': must be at least 2"
        );
    }

    #[test]
    fn test_umbrella_keeps_kind() {
        let err: Error = DecodeError::NoTrack.into();
        assert!(matches!(err, Error::Decode(DecodeError::NoTrack)));

        let err: Error = AnalysisError::failure("size mismatch").into();
        assert!(matches!(err, Error::Analysis(AnalysisError::AnalysisFailure { .. })));
    }
}
