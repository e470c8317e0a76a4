use crate::error::ClientError;
use api_model::protocol::message::api_request_message::{ApiRequestKind, ApiRequestMessage};
use api_model::protocol::message::api_response_message::{ApiResponseKind, ApiResponseMessage};
use api_model::protocol::protocol::Protocol;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

pub struct ConnectionConfig {
    api_port: u16,
    timeout: Duration,
}

impl ConnectionConfig {
    pub fn with_port(api_port: u16) -> Self {
        Self {
            api_port,
            ..Self::default()
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            api_port: 8001,
            timeout: Duration::from_secs(10),
        }
    }
}

/// One request per connection: write the request, shut down the write
/// half, read the response to EOF.
pub struct Connection {
    config: ConnectionConfig,
}

impl Connection {
    pub fn new(config: Option<ConnectionConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    pub fn request(&self, api_request: ApiRequestKind) -> Result<ApiResponseKind, ClientError> {
        let payload = ApiRequestMessage::new(api_request).serialize();
        let addr = format!("127.0.0.1:{}", self.config.api_port);

        let mut stream = TcpStream::connect(&addr).map_err(|e| {
            ClientError::ConnectionError(
                format!("failed to connect to the registry at {}", addr),
                e.to_string(),
            )
        })?;
        stream
            .set_read_timeout(Some(self.config.timeout))
            .map_err(|e| {
                ClientError::ConnectionError(
                    String::from("failed to set read timeout"),
                    e.to_string(),
                )
            })?;

        stream.write_all(&payload).map_err(|e| {
            ClientError::SendError(String::from("failed to send request"), e.to_string())
        })?;
        stream.shutdown(Shutdown::Write).map_err(|e| {
            ClientError::SendError(
                String::from("failed to finish the request stream"),
                e.to_string(),
            )
        })?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).map_err(|e| {
            ClientError::ReceiveError(String::from("failed to receive response"), e.to_string())
        })?;

        let response = ApiResponseMessage::deserialize(&buf).map_err(|e| {
            ClientError::ResponseParseError(
                String::from("failed to deserialize response"),
                e.to_string(),
            )
        })?;
        Ok(response.response)
    }
}
