// Sub-accounts service: create-or-update with seeded defaults, deletion guard,
// listings scoped by permission grants.

use serde::Serialize;

use super::agencies::Sidebar;
use crate::db::sidebar::SidebarOwner;
use crate::db::{
    DashboardDb, DbAgency, DbPermission, DbSidebarOption, DbSubAccount, DbUser,
    SeededSubAccount, SubAccountWithPermissions, UpsertOutcome,
};
use crate::error::ServiceError;
use crate::types::Principal;

/// Sub-account page payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountDetails {
    #[serde(flatten)]
    pub sub_account: DbSubAccount,
    pub agency: DbAgency,
    pub permissions: Vec<DbPermission>,
    pub sidebar_options: Vec<DbSidebarOption>,
}

/// Create or update a sub-account on behalf of the signed-in principal.
///
/// Creating seeds eight navigation entries, the default pipeline, and an
/// `access = true` grant for the principal's email.
pub fn upsert_sub_account(
    db: &DashboardDb,
    principal: Option<&Principal>,
    sub: &DbSubAccount,
) -> Result<UpsertOutcome<SeededSubAccount>, ServiceError> {
    let Some(principal) = principal else {
        return Err(ServiceError::Unauthorized);
    };
    crate::validation::validate_sub_account(sub)?;
    if db.get_agency(&sub.agency_id)?.is_none() {
        return Err(ServiceError::NotFound {
            entity: "Agency",
            id: sub.agency_id.clone(),
        });
    }
    Ok(db.upsert_sub_account_with_defaults(sub, &principal.email)?)
}

/// Delete a sub-account if `acting_user` is the agency owner.
///
/// `Ok(None)` when nobody is acting; `Unauthorized` for every other role.
/// Children go with the row through the storage engine's cascades.
pub fn delete_sub_account(
    db: &DashboardDb,
    acting_user: Option<&DbUser>,
    sub_account_id: &str,
) -> Result<Option<String>, ServiceError> {
    let Some(user) = acting_user else {
        return Ok(None);
    };
    if !crate::access::can_delete_sub_account(user.role) {
        return Err(ServiceError::Unauthorized);
    }
    if !db.delete_sub_account(sub_account_id)? {
        return Err(ServiceError::NotFound {
            entity: "SubAccount",
            id: sub_account_id.to_string(),
        });
    }
    log::info!("Sub-account {} deleted by {}", sub_account_id, user.email);
    Ok(Some(sub_account_id.to_string()))
}

pub fn get_all_sub_accounts(
    db: &DashboardDb,
    agency_id: &str,
) -> Result<Vec<SubAccountWithPermissions>, ServiceError> {
    Ok(db.get_sub_accounts_with_permissions(agency_id)?)
}

/// The agency's sub-accounts that `user_email` holds a grant on.
pub fn get_visible_sub_accounts(
    db: &DashboardDb,
    user_email: &str,
    agency_id: &str,
) -> Result<Vec<SubAccountWithPermissions>, ServiceError> {
    let all = get_all_sub_accounts(db, agency_id)?;
    Ok(crate::access::scope_sub_accounts(all, user_email))
}

pub fn get_sub_account_details(
    db: &DashboardDb,
    sub_account_id: &str,
) -> Result<Option<SubAccountDetails>, ServiceError> {
    let Some(sub_account) = db.get_sub_account(sub_account_id)? else {
        return Ok(None);
    };
    let Some(agency) = db.get_agency(&sub_account.agency_id)? else {
        return Ok(None);
    };
    Ok(Some(SubAccountDetails {
        permissions: db.get_permissions_for_sub_account(sub_account_id)?,
        sidebar_options: db.get_sidebar_options(SidebarOwner::SubAccount, sub_account_id)?,
        agency,
        sub_account,
    }))
}

/// Navigation for a sub-account: its own logo and entries, no switcher list.
pub fn get_sub_account_sidebar(
    db: &DashboardDb,
    sub_account_id: &str,
) -> Result<Option<Sidebar>, ServiceError> {
    let Some(sub_account) = db.get_sub_account(sub_account_id)? else {
        return Ok(None);
    };
    Ok(Some(Sidebar {
        logo: sub_account.sub_account_logo,
        sidebar_options: db.get_sidebar_options(SidebarOwner::SubAccount, sub_account_id)?,
        sub_accounts: Vec::new(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::*;
    use crate::defaults::{DEFAULT_PIPELINE_NAME, SUB_ACCOUNT_SIDEBAR};
    use crate::services::test_support::principal;
    use crate::types::Role;

    #[test]
    fn test_create_seeds_navigation_pipeline_and_grant() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        let outcome = upsert_sub_account(
            &db,
            Some(&principal("a@b.com")),
            &sample_sub_account("sa1", "ag1"),
        )
        .unwrap();
        let UpsertOutcome::Created(seeded) = outcome else {
            panic!("expected a created sub-account");
        };

        assert_eq!(seeded.sidebar_options.len(), 8);
        assert!(seeded.sidebar_options.iter().all(|o| o.link.contains("sa1")));
        assert_eq!(seeded.pipeline.name, DEFAULT_PIPELINE_NAME);
        assert_eq!(seeded.pipeline.sub_account_id, "sa1");
        assert_eq!(seeded.permission.email, "a@b.com");
        assert_eq!(seeded.permission.sub_account_id, "sa1");
        assert!(seeded.permission.access);

        assert_eq!(
            db.get_sidebar_options(SidebarOwner::SubAccount, "sa1").unwrap().len(),
            8
        );
        assert_eq!(db.get_pipelines_for_sub_account("sa1").unwrap().len(), 1);
        assert_eq!(db.get_permissions_for_sub_account("sa1").unwrap().len(), 1);
    }

    #[test]
    fn test_second_upsert_does_not_reseed() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        let p = principal("a@b.com");
        let mut sub = sample_sub_account("sa1", "ag1");
        upsert_sub_account(&db, Some(&p), &sub).unwrap();

        sub.name = "Renamed client".into();
        assert_eq!(
            upsert_sub_account(&db, Some(&p), &sub).unwrap(),
            UpsertOutcome::Updated
        );
        let details = get_sub_account_details(&db, "sa1").unwrap().unwrap();
        assert_eq!(details.sub_account.name, "Renamed client");
        assert_eq!(details.sidebar_options.len(), SUB_ACCOUNT_SIDEBAR.len());
        assert_eq!(details.permissions.len(), 1);
        assert_eq!(details.agency.id, "ag1");
        assert_eq!(db.get_pipelines_for_sub_account("sa1").unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_rejections() {
        let db = test_db();
        assert!(matches!(
            upsert_sub_account(&db, None, &sample_sub_account("sa1", "ag1")),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            upsert_sub_account(&db, Some(&principal("a@b.com")), &sample_sub_account("sa1", "ag1")),
            Err(ServiceError::NotFound { entity: "Agency", .. })
        ));
    }

    #[test]
    fn test_only_owner_deletes() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        upsert_sub_account(&db, Some(&principal("a@b.com")), &sample_sub_account("sa1", "ag1"))
            .unwrap();

        assert_eq!(delete_sub_account(&db, None, "sa1").unwrap(), None);

        for role in [Role::AgencyAdmin, Role::SubaccountUser, Role::SubaccountGuest] {
            let user = sample_user("u", "u@b.com", role, Some("ag1"));
            let err = delete_sub_account(&db, Some(&user), "sa1").unwrap_err();
            assert_eq!(err.to_string(), "Unauthorized!");
            assert!(db.get_sub_account("sa1").unwrap().is_some());
        }

        let owner = sample_user("o", "o@b.com", Role::AgencyOwner, Some("ag1"));
        assert_eq!(
            delete_sub_account(&db, Some(&owner), "sa1").unwrap().as_deref(),
            Some("sa1")
        );
        assert!(db.get_sub_account("sa1").unwrap().is_none());
        assert!(db.get_permissions_for_sub_account("sa1").unwrap().is_empty());
        assert!(db
            .get_sidebar_options(SidebarOwner::SubAccount, "sa1")
            .unwrap()
            .is_empty());

        assert!(matches!(
            delete_sub_account(&db, Some(&owner), "sa1"),
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_visible_sub_accounts_follow_grants() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        upsert_sub_account(&db, Some(&principal("a@b.com")), &sample_sub_account("sa1", "ag1"))
            .unwrap();
        upsert_sub_account(&db, Some(&principal("c@d.com")), &sample_sub_account("sa2", "ag1"))
            .unwrap();
        insert_bare_sub_account(&db, "sa3", "ag1");

        assert_eq!(get_all_sub_accounts(&db, "ag1").unwrap().len(), 3);
        let visible = get_visible_sub_accounts(&db, "a@b.com", "ag1").unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].sub_account.id, "sa1");
        assert!(get_visible_sub_accounts(&db, "z@z.com", "ag1").unwrap().is_empty());
    }

    #[test]
    fn test_sub_account_sidebar_uses_own_logo() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        let sub = sample_sub_account("sa1", "ag1");
        upsert_sub_account(&db, Some(&principal("a@b.com")), &sub).unwrap();

        let sidebar = get_sub_account_sidebar(&db, "sa1").unwrap().unwrap();
        assert_eq!(sidebar.logo, sub.sub_account_logo);
        assert_eq!(sidebar.sidebar_options.len(), 8);
        assert!(sidebar.sub_accounts.is_empty());
        assert!(get_sub_account_sidebar(&db, "nope").unwrap().is_none());
        assert!(get_sub_account_details(&db, "nope").unwrap().is_none());
    }
}
