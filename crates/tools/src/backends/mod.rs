//! Executors the dispatcher can route tool calls to.

pub mod catalog;
pub mod filesystem;
pub mod fixture;
pub mod mcp_proxy;

pub use catalog::CatalogBackend;
pub use filesystem::FilesystemBackend;
pub use fixture::{FixtureBackend, StorageLocation};
pub use mcp_proxy::McpProxyBackend;
