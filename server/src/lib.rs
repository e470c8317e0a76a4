pub mod config;
pub mod constants;
pub mod err;
pub mod global_var;
pub mod interface;
pub mod registry;
pub mod utilities;
