use crate::err::Result;

use super::token::Token;

/// Wire codec for registry messages. A message flattens into a run of
/// CRLF tokens and can be rebuilt either from raw bytes or from a frame
/// that has already been tokenized.
pub trait Protocol {
    /// Encode this message as wire bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Decode a message from raw wire bytes.
    fn deserialize(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;

    /// Decode a message from tokens already parsed out of a frame.
    fn from_tokens(tokens: &[Token]) -> Result<Self>
    where
        Self: Sized;
}
