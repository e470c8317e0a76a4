use std::error;
use std::fmt::{Debug, Display, Formatter};

use api_model::protocol::models::api_error::{ApiError, ErrorCode};

pub type Error = Box<dyn error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes of the registry core.
///
/// `InvalidInput` and `NotFound` reject the request before any state
/// change. `StoreUnavailable` means the metadata document could not be
/// persisted; it is fatal for the failing request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    StoreUnavailable,
    Internal,
}

pub struct RegistryError {
    kind: ErrorKind,
    err: String,
    file: &'static str,
    line: u32,
    source: Option<Error>,
}

impl RegistryError {
    pub fn new(
        kind: ErrorKind,
        err: String,
        file: &'static str,
        line: u32,
        source: Option<Error>,
    ) -> Self {
        Self {
            kind,
            err,
            file,
            line,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl Debug for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}:{}] {:?}: {}",
            self.file, self.line, self.kind, self.err
        )?;
        if let Some(source) = &self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn error::Error))
    }
}

/// Map a boxed error onto the wire-level taxonomy. Anything that is not
/// a `RegistryError` is reported as an internal error.
pub fn into_api_error(e: Error) -> ApiError {
    match e.downcast::<RegistryError>() {
        Ok(re) => {
            let code = match re.kind() {
                ErrorKind::InvalidInput => ErrorCode::InvalidInput,
                ErrorKind::NotFound => ErrorCode::NotFound,
                ErrorKind::StoreUnavailable => ErrorCode::StoreUnavailable,
                ErrorKind::Internal => ErrorCode::Internal,
            };
            ApiError::new(code, re.to_string())
        }
        Err(other) => ApiError::new(ErrorCode::Internal, other.to_string()),
    }
}

#[macro_export]
macro_rules! registry_error {
    ($kind:ident, $fmt:expr $(, $($args:tt)*)?) => {
        $crate::err::RegistryError::new(
            $crate::err::ErrorKind::$kind,
            format!($fmt $(, $($args)*)?),
            file!(),
            line!(),
            None,
        )
    };
}

#[macro_export]
macro_rules! registry_error_with_source {
    ($kind:ident, $source:expr, $fmt:expr $(, $($args:tt)*)?) => {
        $crate::err::RegistryError::new(
            $crate::err::ErrorKind::$kind,
            format!($fmt $(, $($args)*)?),
            file!(),
            line!(),
            Some(Box::new($source)),
        )
    };
}
