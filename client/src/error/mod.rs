use std::fmt::{Debug, Display};

pub enum ClientError {
    ConnectionError(String, String),
    SendError(String, String),
    ReceiveError(String, String),

    ResponseParseError(String, String),
    ServerError(String, String),

    InternalError(String, String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ConnectionError(msg, _) => write!(f, "Connection error: {}", msg),
            ClientError::SendError(msg, _) => write!(f, "Send error: {}", msg),
            ClientError::ReceiveError(msg, _) => write!(f, "Receive error: {}", msg),
            ClientError::ResponseParseError(msg, _) => write!(f, "Response parse error: {}", msg),
            ClientError::ServerError(msg, _) => write!(f, "Server error: {}", msg),
            ClientError::InternalError(msg, _) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl Debug for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ConnectionError(msg, trace) => {
                write!(f, "Connection error: {}\nTrace: {}", msg, trace)
            }
            ClientError::SendError(msg, trace) => {
                write!(f, "Send error: {}\nTrace: {}", msg, trace)
            }
            ClientError::ReceiveError(msg, trace) => {
                write!(f, "Receive error: {}\nTrace: {}", msg, trace)
            }
            ClientError::ResponseParseError(msg, trace) => {
                write!(f, "Response parse error: {}\nTrace: {}", msg, trace)
            }
            ClientError::ServerError(msg, trace) => {
                write!(f, "Server error: {}\nTrace: {}", msg, trace)
            }
            ClientError::InternalError(msg, trace) => {
                write!(f, "Internal error: {}\nTrace: {}", msg, trace)
            }
        }
    }
}
