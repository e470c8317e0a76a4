pub mod message;
pub mod models;
pub mod protocol;
pub mod token;
