pub mod bootstrap;
pub mod config;
pub mod server;

pub use bootstrap::{build, AppState};
pub use config::{Config, ExecutorMode};
pub use server::Server;
