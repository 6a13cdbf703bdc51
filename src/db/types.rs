//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{InvitationStatus, Role};

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

/// A row from the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbUser {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub email: String,
    pub role: Role,
    pub agency_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A row from the `agencies` table. Billing fields are carried but opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbAgency {
    pub id: String,
    pub connect_account_id: Option<String>,
    pub customer_id: String,
    pub name: String,
    pub agency_logo: String,
    pub company_email: String,
    pub company_phone: String,
    pub white_label: bool,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
    pub goal: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// A row from the `sub_accounts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbSubAccount {
    pub id: String,
    pub connect_account_id: Option<String>,
    pub name: String,
    pub sub_account_logo: String,
    pub company_email: String,
    pub company_phone: String,
    pub goal: i64,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
    pub agency_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A row from the `permissions` table: `email` may see `sub_account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbPermission {
    pub id: String,
    pub email: String,
    pub sub_account_id: String,
    pub access: bool,
}

/// A row from the `invitations` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbInvitation {
    pub id: String,
    pub email: String,
    pub agency_id: String,
    pub status: InvitationStatus,
    pub role: Role,
}

/// A row from the `notifications` table. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbNotification {
    pub id: String,
    pub notification: String,
    pub agency_id: String,
    pub sub_account_id: Option<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A navigation entry owned by an agency or a sub-account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbSidebarOption {
    pub id: String,
    pub name: String,
    pub link: String,
    pub icon: String,
    /// Owning agency or sub-account id, depending on the table.
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A row from the `pipelines` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbPipeline {
    pub id: String,
    pub name: String,
    pub sub_account_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A row from the `media` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbMedia {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    pub name: String,
    pub link: String,
    pub sub_account_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// An agency together with the sub-accounts it owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyWithSubAccounts {
    #[serde(flatten)]
    pub agency: DbAgency,
    pub sub_accounts: Vec<DbSubAccount>,
}

/// A user eagerly loaded with its permission grants and its agency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithAccess {
    #[serde(flatten)]
    pub user: DbUser,
    pub permissions: Vec<DbPermission>,
    pub agency: Option<AgencyWithSubAccounts>,
}

/// A sub-account with its permission grants, the input of access scoping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountWithPermissions {
    #[serde(flatten)]
    pub sub_account: DbSubAccount,
    pub permissions: Vec<DbPermission>,
}

/// Freshly created agency with the children seeded alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededAgency {
    #[serde(flatten)]
    pub agency: DbAgency,
    pub users: Vec<DbUser>,
    pub sidebar_options: Vec<DbSidebarOption>,
}

/// Freshly created sub-account with the children seeded alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededSubAccount {
    #[serde(flatten)]
    pub sub_account: DbSubAccount,
    pub sidebar_options: Vec<DbSidebarOption>,
    pub pipeline: DbPipeline,
    pub permission: DbPermission,
}

/// Result of a create-or-update whose create branch seeds children.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome<T> {
    /// The row existed; only its own fields were overwritten.
    Updated,
    /// The row was created and seeded.
    Created(T),
}

impl<T> UpsertOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }
}
