pub mod err;
pub mod protocol;
