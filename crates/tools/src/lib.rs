//! Tool catalog and executor dispatch for mcp-relay.
//!
//! The catalog is the static table of tools the relay advertises to the
//! completion backend. The dispatcher resolves a tool's executor key and hands
//! the call to whichever [`ToolBackend`] is routed for it.

pub mod arguments;
pub mod backends;
pub mod builtin;
pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod traits;

pub use arguments::Arguments;
pub use backends::{CatalogBackend, FilesystemBackend, FixtureBackend, McpProxyBackend, StorageLocation};
pub use catalog::{Category, ToolCatalog, ToolSpec};
pub use dispatcher::{ToolDispatcher, ToolOutput};
pub use error::{BackendError, ToolError};
pub use traits::ToolBackend;
