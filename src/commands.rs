//! Request handlers.
//!
//! Each handler asks the identity provider who is signed in, runs one
//! service operation against the shared database, and shapes the outcome for
//! the caller. Mutations answer with an `ActionResponse`; reads answer with
//! `Option` so that "nobody signed in" and "nothing there" stay non-errors.

use serde::Serialize;

use crate::db::{
    DbAgency, DbInvitation, DbMedia, DbNotification, DbPermission, DbSubAccount, DbUser,
    SeededAgency, SeededSubAccount, UserWithAccess,
};
use crate::error::{ActionResponse, ServiceError};
use crate::services::agencies::{AgencyDetails, Sidebar};
use crate::services::sub_accounts::SubAccountDetails;
use crate::services::{
    agencies, invitations, media, notifications, permissions, sub_accounts, users,
};
use crate::state::AppState;
use crate::types::Role;

/// Where the agency entry page sends the signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AgencyLanding {
    /// Agency-level roles go to the agency dashboard.
    #[serde(rename_all = "camelCase")]
    Dashboard { agency_id: String },
    /// Sub-account roles go to the agency's sub-account area.
    #[serde(rename_all = "camelCase")]
    SubAccounts { agency_id: String },
    /// No agency yet: show the create-agency form.
    CreateAgency,
}

/// Where the sub-account entry page sends the signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubAccountLanding {
    /// Not a member of any agency.
    Unauthorized,
    SignIn,
    /// The agency's first sub-account, if it has any.
    #[serde(rename_all = "camelCase")]
    SubAccount { sub_account_id: Option<String> },
}

// =============================================================================
// Identity and onboarding
// =============================================================================

pub fn get_current_user(state: &AppState) -> Result<Option<UserWithAccess>, ServiceError> {
    let principal = state.principal();
    state.with_db(|db| users::resolve_current_user(db, principal.as_ref()))
}

/// Accept any pending invitation, then route by the resolved user's role.
pub fn agency_landing(state: &AppState) -> Result<AgencyLanding, ServiceError> {
    let principal = state.principal();
    state.with_db(|db| {
        let agency = invitations::reconcile_invitation(db, principal.as_ref())?;
        let user = users::resolve_current_user(db, principal.as_ref())?;
        Ok(match (agency, user) {
            (Some(agency), Some(user)) if crate::access::is_agency_level(user.user.role) => {
                AgencyLanding::Dashboard {
                    agency_id: agency.id,
                }
            }
            (Some(agency), Some(_)) => AgencyLanding::SubAccounts {
                agency_id: agency.id,
            },
            _ => AgencyLanding::CreateAgency,
        })
    })
}

pub fn sub_account_landing(state: &AppState) -> Result<SubAccountLanding, ServiceError> {
    let principal = state.principal();
    state.with_db(|db| {
        if invitations::reconcile_invitation(db, principal.as_ref())?.is_none() {
            return Ok(SubAccountLanding::Unauthorized);
        }
        let Some(user) = users::resolve_current_user(db, principal.as_ref())? else {
            return Ok(SubAccountLanding::SignIn);
        };
        let sub_account_id = user
            .agency
            .and_then(|agency| agency.sub_accounts.into_iter().next())
            .map(|sub| sub.id);
        Ok(SubAccountLanding::SubAccount { sub_account_id })
    })
}

// =============================================================================
// Agencies and sub-accounts
// =============================================================================

pub fn upsert_agency(state: &AppState, agency: DbAgency) -> ActionResponse<SeededAgency> {
    let principal = state.principal();
    ActionResponse::from_upsert(
        state.with_db(|db| agencies::upsert_agency(db, principal.as_ref(), &agency)),
    )
}

pub fn upsert_sub_account(
    state: &AppState,
    sub_account: DbSubAccount,
) -> ActionResponse<SeededSubAccount> {
    let principal = state.principal();
    ActionResponse::from_upsert(state.with_db(|db| {
        sub_accounts::upsert_sub_account(db, principal.as_ref(), &sub_account)
    }))
}

/// `None` when nobody is signed in.
pub fn delete_sub_account(state: &AppState, sub_account_id: &str) -> Option<ActionResponse<String>> {
    let principal = state.principal();
    let result = state.with_db(|db| {
        let acting = users::resolve_current_user(db, principal.as_ref())?.map(|u| u.user);
        sub_accounts::delete_sub_account(db, acting.as_ref(), sub_account_id)
    });
    match result {
        Ok(None) => None,
        Ok(Some(id)) => Some(ActionResponse::success(id)),
        Err(e) => Some(ActionResponse::from_error(&e)),
    }
}

/// `None` when nobody is signed in.
pub fn delete_agency(state: &AppState, agency_id: &str) -> Option<ActionResponse<String>> {
    let principal = state.principal();
    let result = state.with_db(|db| {
        let acting = users::resolve_current_user(db, principal.as_ref())?.map(|u| u.user);
        agencies::delete_agency(db, acting.as_ref(), agency_id)
    });
    match result {
        Ok(None) => None,
        Ok(Some(id)) => Some(ActionResponse::success(id)),
        Err(e) => Some(ActionResponse::from_error(&e)),
    }
}

pub fn get_agency_details(
    state: &AppState,
    agency_id: &str,
) -> Result<Option<AgencyDetails>, ServiceError> {
    state.with_db(|db| agencies::get_agency_details(db, agency_id))
}

pub fn get_sub_account_details(
    state: &AppState,
    sub_account_id: &str,
) -> Result<Option<SubAccountDetails>, ServiceError> {
    state.with_db(|db| sub_accounts::get_sub_account_details(db, sub_account_id))
}

/// Sub-accounts of the agency the signed-in user can see.
pub fn get_visible_sub_accounts(
    state: &AppState,
    agency_id: &str,
) -> Result<Option<Vec<crate::db::SubAccountWithPermissions>>, ServiceError> {
    let Some(principal) = state.principal() else {
        return Ok(None);
    };
    state
        .with_db(|db| sub_accounts::get_visible_sub_accounts(db, &principal.email, agency_id))
        .map(Some)
}

pub fn get_agency_sidebar(state: &AppState, agency_id: &str) -> Result<Option<Sidebar>, ServiceError> {
    let Some(principal) = state.principal() else {
        return Ok(None);
    };
    let default_logo = state.config.default_logo();
    state.with_db(|db| agencies::get_agency_sidebar(db, agency_id, &principal.email, default_logo))
}

pub fn get_sub_account_sidebar(
    state: &AppState,
    sub_account_id: &str,
) -> Result<Option<Sidebar>, ServiceError> {
    state.with_db(|db| sub_accounts::get_sub_account_sidebar(db, sub_account_id))
}

// =============================================================================
// Team, permissions and invitations
// =============================================================================

pub fn get_team_members(state: &AppState, agency_id: &str) -> Result<Vec<DbUser>, ServiceError> {
    state.with_db(|db| users::get_team_members(db, agency_id))
}

pub fn update_user(state: &AppState, user: DbUser) -> ActionResponse<DbUser> {
    state.with_db(|db| users::update_user(db, &user)).into()
}

pub fn set_permission(
    state: &AppState,
    permission_id: Option<&str>,
    access: bool,
    email: &str,
    sub_account_id: &str,
) -> ActionResponse<DbPermission> {
    state
        .with_db(|db| {
            permissions::set_permission(db, permission_id, access, email, sub_account_id)
        })
        .into()
}

pub fn send_invitation(
    state: &AppState,
    agency_id: &str,
    email: &str,
    role: Role,
) -> ActionResponse<DbInvitation> {
    state
        .with_db(|db| invitations::create_invitation(db, agency_id, email, role))
        .into()
}

// =============================================================================
// Activity log and media
// =============================================================================

pub fn save_activity_log_notification(
    state: &AppState,
    agency_id: Option<&str>,
    sub_account_id: Option<&str>,
    message: &str,
) -> Result<Option<DbNotification>, ServiceError> {
    let principal = state.principal();
    state.with_db(|db| {
        notifications::save_activity_log_notification(
            db,
            principal.as_ref(),
            agency_id,
            sub_account_id,
            message,
        )
    })
}

pub fn get_notifications(
    state: &AppState,
    agency_id: &str,
) -> Result<Vec<DbNotification>, ServiceError> {
    state.with_db(|db| notifications::get_notifications(db, agency_id))
}

pub fn create_media(
    state: &AppState,
    sub_account_id: &str,
    name: &str,
    link: &str,
) -> ActionResponse<DbMedia> {
    state
        .with_db(|db| media::create_media(db, sub_account_id, name, link))
        .into()
}

pub fn get_all_media(state: &AppState, sub_account_id: &str) -> Result<Vec<DbMedia>, ServiceError> {
    state.with_db(|db| media::get_all_media(db, sub_account_id))
}

pub fn delete_media(state: &AppState, media_id: &str) -> ActionResponse<DbMedia> {
    state.with_db(|db| media::delete_media(db, media_id)).into()
}
