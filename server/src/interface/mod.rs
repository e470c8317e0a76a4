pub mod handlers;

mod listener;
pub use listener::{ApiListener, ListenerHandle};
