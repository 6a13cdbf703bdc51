//! Shared domain types: roles, invitation status, the authenticated principal,
//! and on-disk configuration.

use serde::{Deserialize, Serialize};

/// Logo shown for agencies that are not white-labelled.
pub const DEFAULT_LOGO: &str = "/assets/plura-logo.svg";

/// A user's role inside an agency. Stored as its SQL label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    AgencyOwner,
    AgencyAdmin,
    SubaccountUser,
    SubaccountGuest,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::AgencyOwner,
        Role::AgencyAdmin,
        Role::SubaccountUser,
        Role::SubaccountGuest,
    ];

    /// String label for SQL storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::AgencyOwner => "AGENCY_OWNER",
            Role::AgencyAdmin => "AGENCY_ADMIN",
            Role::SubaccountUser => "SUBACCOUNT_USER",
            Role::SubaccountGuest => "SUBACCOUNT_GUEST",
        }
    }

    /// Parse from SQL string. Unknown labels fall back to the least
    /// privileged role.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "AGENCY_OWNER" => Role::AgencyOwner,
            "AGENCY_ADMIN" => Role::AgencyAdmin,
            "SUBACCOUNT_USER" => Role::SubaccountUser,
            _ => Role::SubaccountGuest,
        }
    }
}

/// Lifecycle of an invitation. Accepted invitations are deleted, so
/// `Accepted` is only observed transiently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "PENDING",
            InvitationStatus::Accepted => "ACCEPTED",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "ACCEPTED" => InvitationStatus::Accepted,
            _ => InvitationStatus::Pending,
        }
    }
}

/// The authenticated principal as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl Principal {
    /// Display name assembled from first and last name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Contents of `~/.agency-hub/config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Explicit database file. Defaults to `~/.agency-hub/agency-hub.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    /// Logo used in navigation when an agency is not white-labelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_logo: Option<String>,
}

impl Config {
    pub fn default_logo(&self) -> &str {
        self.default_logo.as_deref().unwrap_or(DEFAULT_LOGO)
    }
}
