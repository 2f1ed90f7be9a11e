//! Conversion failures and their mapping onto failure classes and HTTP statuses.

use axum::http::StatusCode;
use cryptconv_codec::CodecError;
use thiserror::Error;

/// Everything that can turn a request into an `{error}` response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Missing or unusable request field.
    #[error("{0}")]
    Validation(String),

    /// `type` is absent or not one of the four conversions.
    #[error("unsupported conversion type")]
    UnsupportedType,

    /// The body is not a JSON object of string fields.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// The body exceeds the configured size limit.
    #[error("request body too large")]
    BodyTooLarge,

    /// The conversion did not finish within the request timeout.
    #[error("request timed out")]
    TimedOut,

    /// The worker running the conversion died.
    #[error("internal error: {0}")]
    Internal(&'static str),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ConvertError {
    /// Machine-readable failure class, used for logs and status codes.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Validation(_)
            | Self::UnsupportedType
            | Self::InvalidJson(_)
            | Self::BodyTooLarge => "validation",
            Self::TimedOut | Self::Internal(_) => "internal",
            Self::Codec(e) => match e {
                CodecError::Decode(_) => "decode",
                CodecError::Encoding => "encoding",
                CodecError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
                CodecError::Decryption(_) => "decryption",
                CodecError::InvalidPublicKey(_) => "invalid_public_key",
                CodecError::InvalidPrivateKey(_) => "invalid_private_key",
                CodecError::UnwrapFailure => "unwrap_failure",
                CodecError::KeyDerivation(_)
                | CodecError::Encryption(_)
                | CodecError::SecureMemory(_) => "internal",
            },
        }
    }

    /// HTTP status for this failure.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TimedOut => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Codec(e) if !e.is_input_error() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
