use crate::credential::{Credential, CredentialTier, PrivilegedKeys};
use mcp_relay_tools::ToolCatalog;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    UnknownTool,
    InsufficientTier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDecision {
    Allow,
    Deny(DenyReason),
}

impl PermissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionDecision::Allow)
    }

    /// The message returned to the model in place of a tool result.
    pub fn denial_message(&self, tool_name: &str) -> Option<String> {
        match self {
            PermissionDecision::Allow => None,
            PermissionDecision::Deny(DenyReason::UnknownTool) => {
                Some(format!("Unknown function: {}", tool_name))
            }
            PermissionDecision::Deny(DenyReason::InsufficientTier) => {
                Some(format!("Permission denied for {}", tool_name))
            }
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::UnknownTool => write!(f, "unknown tool"),
            DenyReason::InsufficientTier => write!(f, "insufficient tier"),
        }
    }
}

/// Decides whether a credential may invoke a tool. Pure, no I/O.
pub struct PermissionEngine {
    catalog: Arc<ToolCatalog>,
    privileged: PrivilegedKeys,
}

impl PermissionEngine {
    pub fn new(catalog: Arc<ToolCatalog>, privileged: PrivilegedKeys) -> Self {
        Self {
            catalog,
            privileged,
        }
    }

    pub fn tier_of(&self, credential: &Credential) -> CredentialTier {
        self.privileged.tier_of(credential)
    }

    pub fn privileged_key_count(&self) -> usize {
        self.privileged.len()
    }

    pub fn authorize(&self, credential: &Credential, tool_name: &str) -> PermissionDecision {
        let Some(spec) = self.catalog.lookup(tool_name) else {
            warn!("Denied unknown tool: {}", tool_name);
            return PermissionDecision::Deny(DenyReason::UnknownTool);
        };

        if !spec.requires_privilege {
            return PermissionDecision::Allow;
        }

        match self.tier_of(credential) {
            CredentialTier::Privileged => {
                debug!("Privileged call allowed: {}", tool_name);
                PermissionDecision::Allow
            }
            CredentialTier::Standard => {
                warn!("Denied privileged tool {} for standard credential", tool_name);
                PermissionDecision::Deny(DenyReason::InsufficientTier)
            }
        }
    }
}
