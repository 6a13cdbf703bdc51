// Agencies service: create-or-update with seeded defaults, details, navigation.

use serde::Serialize;

use crate::db::sidebar::SidebarOwner;
use crate::db::{
    DashboardDb, DbAgency, DbSidebarOption, DbUser, SeededAgency, SubAccountWithPermissions,
    UpsertOutcome,
};
use crate::error::ServiceError;
use crate::types::Principal;

/// Agency page payload: the agency with its navigation, sub-accounts and team.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyDetails {
    #[serde(flatten)]
    pub agency: DbAgency,
    pub sidebar_options: Vec<DbSidebarOption>,
    pub sub_accounts: Vec<SubAccountWithPermissions>,
    pub users: Vec<DbUser>,
}

/// What the navigation shell renders: a logo, entries, and the sub-accounts
/// the viewer can switch to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub logo: String,
    pub sidebar_options: Vec<DbSidebarOption>,
    pub sub_accounts: Vec<SubAccountWithPermissions>,
}

/// Create or update an agency on behalf of the signed-in principal.
///
/// Creating seeds six navigation entries and makes the principal the
/// agency's owner. Updating leaves children untouched.
pub fn upsert_agency(
    db: &DashboardDb,
    principal: Option<&Principal>,
    agency: &DbAgency,
) -> Result<UpsertOutcome<SeededAgency>, ServiceError> {
    let Some(principal) = principal else {
        return Err(ServiceError::Unauthorized);
    };
    crate::validation::validate_agency(agency)?;
    Ok(db.upsert_agency_with_defaults(agency, principal)?)
}

/// Delete an agency if `acting_user` is its owner.
///
/// `Ok(None)` when nobody is acting; `Unauthorized` for any other role and
/// for owners of a different agency. Users, sub-accounts and everything
/// below them go with the row through the storage engine's cascades.
pub fn delete_agency(
    db: &DashboardDb,
    acting_user: Option<&DbUser>,
    agency_id: &str,
) -> Result<Option<String>, ServiceError> {
    let Some(user) = acting_user else {
        return Ok(None);
    };
    if !crate::access::can_delete_agency(user.role) || user.agency_id.as_deref() != Some(agency_id)
    {
        return Err(ServiceError::Unauthorized);
    }
    if !db.delete_agency(agency_id)? {
        return Err(ServiceError::NotFound {
            entity: "Agency",
            id: agency_id.to_string(),
        });
    }
    log::info!("Agency {} deleted by {}", agency_id, user.email);
    Ok(Some(agency_id.to_string()))
}

pub fn get_agency_details(
    db: &DashboardDb,
    agency_id: &str,
) -> Result<Option<AgencyDetails>, ServiceError> {
    let Some(agency) = db.get_agency(agency_id)? else {
        return Ok(None);
    };
    Ok(Some(AgencyDetails {
        sidebar_options: db.get_sidebar_options(SidebarOwner::Agency, agency_id)?,
        sub_accounts: db.get_sub_accounts_with_permissions(agency_id)?,
        users: db.get_users_for_agency(agency_id)?,
        agency,
    }))
}

/// Navigation for an agency as seen by `viewer_email`.
///
/// The agency's own logo is shown only when it is white-labelled; otherwise
/// `default_logo` is. Sub-accounts are narrowed to the ones the viewer holds
/// a grant on.
pub fn get_agency_sidebar(
    db: &DashboardDb,
    agency_id: &str,
    viewer_email: &str,
    default_logo: &str,
) -> Result<Option<Sidebar>, ServiceError> {
    let Some(agency) = db.get_agency(agency_id)? else {
        return Ok(None);
    };
    let logo = if agency.white_label {
        agency.agency_logo
    } else {
        default_logo.to_string()
    };
    let sub_accounts = crate::access::scope_sub_accounts(
        db.get_sub_accounts_with_permissions(agency_id)?,
        viewer_email,
    );
    Ok(Some(Sidebar {
        logo,
        sidebar_options: db.get_sidebar_options(SidebarOwner::Agency, agency_id)?,
        sub_accounts,
    }))
}
