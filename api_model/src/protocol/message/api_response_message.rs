use crate::err::Result;
use crate::protocol::models::api_error::ApiError;
use crate::protocol::models::graph::fetch_graph::FetchGraphResponse;
use crate::protocol::models::graph::list_graphs::ListGraphsResponse;
use crate::protocol::models::graph::register_graph::RegisterGraphResponse;
use crate::protocol::models::graph::upload_graph::UploadGraphResponse;
use crate::protocol::protocol::Protocol;
use crate::protocol::token::Token;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum ApiResponseKind {
    Error(ApiError),
    ListGraphs(ListGraphsResponse),
    FetchGraph(FetchGraphResponse),
    RegisterGraph(RegisterGraphResponse),
    UploadGraph(UploadGraphResponse),
}

#[derive(Debug, Clone)]
pub struct ApiResponseMessage {
    pub response: ApiResponseKind,
}

impl Protocol for ApiResponseMessage {
    fn serialize(&self) -> Vec<u8> {
        // Format: +GRAPH_RESP, $<response-bytes>
        let resp_bytes = bincode::serialize(&self.response).unwrap_or_else(|_e| Vec::new());
        let tokens = vec![
            Token::Simple(String::from("GRAPH_RESP")),
            Token::Data(bytes::Bytes::from(resp_bytes)),
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
                    "expected 2 tokens for ApiResponseMessage, got {}",
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
                    "expected 2 tokens for ApiResponseMessage, got {}",
                    tokens.len()
                ),
            )
            .into());
        }
        match &tokens[0] {
            Token::Simple(s) if s == "GRAPH_RESP" => {}
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected leading Simple(\"GRAPH_RESP\"), got {:?}", other),
                )
                .into());
            }
        }
        let response = match &tokens[1] {
            Token::Data(b) => match bincode::deserialize::<ApiResponseKind>(&b[..]) {
                Ok(v) => v,
                Err(e) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("bincode decode ApiResponseKind failed: {}", e),
                    )
                    .into());
                }
            },
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected Data for response, got {:?}", other),
                )
                .into());
            }
        };
        Ok(ApiResponseMessage { response })
    }
}
