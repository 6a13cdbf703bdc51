//! Identity provider boundary.
//!
//! Session issuance and token checks live with the external provider. This
//! crate only asks it who is signed in, then passes that principal
//! explicitly into every service call.

use crate::types::Principal;

pub trait IdentityProvider: Send + Sync {
    /// The signed-in principal, or `None` when nobody is.
    fn current_principal(&self) -> Option<Principal>;
}

/// A provider that always reports the same principal (or nobody).
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity(pub Option<Principal>);

impl FixedIdentity {
    pub fn signed_in(principal: Principal) -> Self {
        FixedIdentity(Some(principal))
    }

    pub fn anonymous() -> Self {
        FixedIdentity(None)
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_principal(&self) -> Option<Principal> {
        self.0.clone()
    }
}
