use crate::err::Result;
use bytes::Bytes;
use std::io;

#[derive(Clone, Debug)]
pub enum Token {
    // +XXXX\r\n
    Simple(String),
    // -XXXX\r\n
    Error(String),
    // $<len>\r\n<bytes>\r\n
    Data(Bytes),
    // :XXXX\r\n
    Integer(u64),
    // ^\r\n
    Null,
}

impl Token {
    #[inline]
    fn to_string(bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    /// Convert this token to its wire-format bytes.
    /// Formats mirror the parser:
    /// - +<utf8>\r\n for Simple
    /// - -<utf8>\r\n for Error
    /// - $<len>\r\n<bytes>\r\n for Data (length-prefixed, payload may hold CRLF)
    /// - :<u64>\r\n for Integer
    /// - ^\r\n       for Null
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Token::Simple(s) => {
                out.push(b'+');
                out.extend_from_slice(s.as_bytes());
            }
            Token::Error(s) => {
                out.push(b'-');
                out.extend_from_slice(s.as_bytes());
            }
            Token::Data(b) => {
                out.push(b'$');
                let mut buf = [0u8; lexical_core::BUFFER_SIZE];
                let slc = lexical_core::write(b.len() as u64, &mut buf);
                out.extend_from_slice(slc);
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(b);
            }
            Token::Integer(v) => {
                out.push(b':');
                let mut buf = [0u8; lexical_core::BUFFER_SIZE];
                let slc = lexical_core::write(*v, &mut buf);
                out.extend_from_slice(slc);
            }
            Token::Null => {
                out.push(b'^');
            }
        }
        out.extend_from_slice(b"\r\n");
        out
    }

    /// Parse a single token from the given byte slice.
    /// Returns the parsed token and the number of bytes consumed.
    pub fn parse_one(input: &[u8]) -> Result<(Token, usize)> {
        if input.is_empty() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "empty input").into());
        }
        // Find CRLF
        let mut i = 0usize;
        let mut crlf_pos: Option<usize> = None;
        while i + 1 < input.len() {
            if input[i] == b'\r' && input[i + 1] == b'\n' {
                crlf_pos = Some(i);
                break;
            }
            i += 1;
        }
        let end =
            crlf_pos.ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "missing CRLF"))?;
        if input[0] == b'^' {
            // Expect exactly '^\r\n'
            if end != 1 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "null token must be exactly '^\\r\\n'",
                )
                .into());
            }
            return Ok((Token::Null, end + 2));
        }
        if input.len() < 2 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "too short").into());
        }
        let (prefix, body) = (input[0], &input[1..end]);
        let consumed = end + 2;
        if prefix == b'$' {
            // Length-prefixed: the header line holds the payload length,
            // the payload follows and ends with its own CRLF.
            let len = match lexical_core::parse::<u64>(body) {
                Ok(v) => v as usize,
                Err(e) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("invalid data length: {:?}", e),
                    )
                    .into());
                }
            };
            let start = consumed;
            // The length came off the wire; checked math keeps a hostile
            // header from overflowing the bounds computation.
            let total = match start.checked_add(len).and_then(|t| t.checked_add(2)) {
                Some(t) => t,
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "data length out of range",
                    )
                    .into());
                }
            };
            if input.len() < total {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated data token",
                )
                .into());
            }
            if input[start + len] != b'\r' || input[start + len + 1] != b'\n' {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "data token missing trailing CRLF",
                )
                .into());
            }
            let payload = Bytes::copy_from_slice(&input[start..start + len]);
            return Ok((Token::Data(payload), total));
        }
        let token = match prefix {
            b'+' => Token::Simple(Self::to_string(body)?),
            b'-' => Token::Error(Self::to_string(body)?),
            b':' => match lexical_core::parse::<u64>(body) {
                Ok(v) => Token::Integer(v),
                Err(e) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("invalid integer: {:?}", e),
                    )
                    .into());
                }
            },
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown token prefix: {}", other as char),
                )
                .into());
            }
        };
        Ok((token, consumed))
    }

    /// Parse all tokens from the input until exhaustion.
    /// Uses an index cursor without modifying the input slice.
    pub fn parse_all(input: &[u8]) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut idx: usize = 0;
        while idx < input.len() {
            let (tok, used) = Self::parse_one(&input[idx..])?;
            tokens.push(tok);
            idx += used;
        }
        Ok(tokens)
    }
}
