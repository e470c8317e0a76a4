use crate::err::Result;
use crate::protocol::models::graph::fetch_graph::FetchGraphRequest;
use crate::protocol::models::graph::list_graphs::ListGraphsRequest;
use crate::protocol::models::graph::register_graph::RegisterGraphRequest;
use crate::protocol::models::graph::upload_graph::UploadGraphRequest;
use crate::protocol::protocol::Protocol;
use crate::protocol::token::Token;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum ApiRequestKind {
    ListGraphs(ListGraphsRequest),
    FetchGraph(FetchGraphRequest),
    RegisterGraph(RegisterGraphRequest),
    UploadGraph(UploadGraphRequest),
}

#[derive(Debug, Clone)]
pub struct ApiRequestMessage {
    pub request: ApiRequestKind,
}

impl ApiRequestMessage {
    pub fn new(request: ApiRequestKind) -> Self {
        Self { request }
    }
}

impl Protocol for ApiRequestMessage {
    fn serialize(&self) -> Vec<u8> {
        // Format: +GRAPH_REQ, $<request-bytes>
        let request_bytes = bincode::serialize(&self.request).unwrap_or_else(|_e| Vec::new());
        let tokens = vec![
            Token::Simple(String::from("GRAPH_REQ")),
            Token::Data(bytes::Bytes::from(request_bytes)),
        ];
        let mut out = Vec::new();
        for t in tokens {
            out.extend_from_slice(&t.to_bytes());
        }
        out
    }

    fn deserialize(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        use std::io;
        let tokens = Token::parse_all(bytes)?;
        if tokens.len() != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "expected 2 tokens for ApiRequestMessage, got {}",
                    tokens.len()
                ),
            )
            .into());
        }
        Self::from_tokens(&tokens)
    }

    fn from_tokens(tokens: &[Token]) -> Result<Self>
    where
        Self: Sized,
    {
        use std::io;
        if tokens.len() != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "expected 2 tokens for ApiRequestMessage, got {}",
                    tokens.len()
                ),
            )
            .into());
        }
        match &tokens[0] {
            Token::Simple(s) if s == "GRAPH_REQ" => {}
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected leading Simple(\"GRAPH_REQ\"), got {:?}", other),
                )
                .into());
            }
        }
        let request = match &tokens[1] {
            Token::Data(b) => match bincode::deserialize::<ApiRequestKind>(&b[..]) {
                Ok(v) => v,
                Err(e) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("bincode decode ApiRequestKind failed: {}", e),
                    )
                    .into());
                }
            },
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected Data for request, got {:?}", other),
                )
                .into());
            }
        };
        Ok(ApiRequestMessage { request })
    }
}
