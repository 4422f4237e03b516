use thiserror::Error;

/// Text shown when a failure carries no server-supplied explanation.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (network down, CORS, aborted).
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx response without a usable envelope.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    /// The body was not the JSON shape the caller expected.
    #[error("decode error: {0}")]
    Decode(String),
    /// The server answered `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Message suitable for a notification or dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) | Self::Status { message, .. } if !message.is_empty() => {
                message.clone()
            }
            _ => GENERIC_FAILURE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_messages_are_shown_verbatim() {
        let err = ApiError::Rejected("Email already subscribed.".into());
        assert_eq!(err.user_message(), "Email already subscribed.");

        let err = ApiError::Status {
            status: 404,
            message: "Product not found.".into(),
        };
        assert_eq!(err.user_message(), "Product not found.");
    }

    #[test]
    fn transport_failures_use_generic_text() {
        assert_eq!(
            ApiError::Transport("connection refused".into()).user_message(),
            GENERIC_FAILURE
        );
        assert_eq!(
            ApiError::Status {
                status: 500,
                message: String::new()
            }
            .user_message(),
            GENERIC_FAILURE
        );
    }
}
