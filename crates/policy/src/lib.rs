//! Per-credential access control for relay tools.

pub mod credential;
pub mod permissions;

pub use credential::{Credential, CredentialTier, PrivilegedKeys};
pub use permissions::{DenyReason, PermissionDecision, PermissionEngine};
