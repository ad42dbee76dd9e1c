use thiserror::Error;

/// Every failure this crate can surface to a caller.
///
/// Transport-level errors are surfaced verbatim through the single
/// completion path and are never retried by this layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("SSL protocol error")]
    SslProtocolError,

    // Request Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unsupported scheme")]
    UnsupportedScheme,
    #[error("Invalid header name or value")]
    InvalidHeader,
    #[error("Request already started")]
    RequestAlreadyStarted,

    // Response Errors
    #[error("HTTP protocol error")]
    HttpProtocolError,
    #[error("HTTP body error")]
    HttpBodyError,
    #[error("Content decoding failed")]
    ContentDecodingFailed,

    // Bridge Errors
    #[error("Bridge failure: {0}")]
    BridgeFailure(String),
}

impl From<std::io::Error> for NetError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            ErrorKind::ConnectionReset => NetError::ConnectionReset,
            ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
            ErrorKind::NotConnected => NetError::ConnectionClosed,
            ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            ErrorKind::UnexpectedEof => NetError::ConnectionClosed,
            _ => NetError::ConnectionFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn io_error_kinds_map_onto_taxonomy() {
        assert_eq!(
            NetError::from(Error::new(ErrorKind::ConnectionRefused, "refused")),
            NetError::ConnectionRefused
        );
        assert_eq!(
            NetError::from(Error::new(ErrorKind::TimedOut, "slow")),
            NetError::ConnectionTimedOut
        );
        assert_eq!(
            NetError::from(Error::new(ErrorKind::Other, "anything else")),
            NetError::ConnectionFailed
        );
    }
}
