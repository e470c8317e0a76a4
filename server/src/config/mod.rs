mod config;
pub use config::Config;
pub use config::get_or_create_config;

mod env_var;
pub use env_var::EnvVar;

mod opts;
pub use opts::Opts;
