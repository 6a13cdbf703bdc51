// Users service: who is signed in, team listing, profile updates.

use crate::db::{DashboardDb, DbUser, UserWithAccess};
use crate::error::ServiceError;
use crate::types::Principal;

/// Resolve the signed-in principal to its stored user, eagerly loaded with
/// permission grants and its agency (including the agency's sub-accounts).
///
/// `None` means there is nobody signed in or the principal has no user row
/// yet; callers treat both as "send to sign-in / onboarding".
pub fn resolve_current_user(
    db: &DashboardDb,
    principal: Option<&Principal>,
) -> Result<Option<UserWithAccess>, ServiceError> {
    let Some(principal) = principal else {
        return Ok(None);
    };
    match db.get_user_by_email(&principal.email)? {
        Some(user) => Ok(Some(db.load_user_access(user)?)),
        None => {
            log::debug!("No user row for principal {}", principal.email);
            Ok(None)
        }
    }
}

/// Same eager loading as `resolve_current_user`, by user id.
pub fn get_user(db: &DashboardDb, user_id: &str) -> Result<Option<UserWithAccess>, ServiceError> {
    match db.get_user(user_id)? {
        Some(user) => Ok(Some(db.load_user_access(user)?)),
        None => Ok(None),
    }
}

/// Overwrite an existing user's name, avatar, email and role.
pub fn update_user(db: &DashboardDb, user: &DbUser) -> Result<DbUser, ServiceError> {
    crate::validation::validate_user(user)?;
    if !db.update_user(user)? {
        return Err(ServiceError::NotFound {
            entity: "User",
            id: user.id.clone(),
        });
    }
    log::info!("Updated user {} ({})", user.id, user.role.as_str());
    db.get_user(&user.id)?.ok_or_else(|| ServiceError::NotFound {
        entity: "User",
        id: user.id.clone(),
    })
}

/// Users belonging to an agency, ordered by name.
pub fn get_team_members(db: &DashboardDb, agency_id: &str) -> Result<Vec<DbUser>, ServiceError> {
    Ok(db.get_users_for_agency(agency_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::*;
    use crate::services::test_support::principal;
    use crate::types::Role;

    #[test]
    fn test_unknown_principal_resolves_to_none() {
        let db = test_db();
        assert!(resolve_current_user(&db, None).unwrap().is_none());
        for email in ["ghost@x.com", "", "a@b.com"] {
            let p = principal(email);
            assert!(resolve_current_user(&db, Some(&p)).unwrap().is_none());
        }
    }

    #[test]
    fn test_resolved_user_carries_permissions_and_agency_sub_accounts() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        db.insert_user(&sample_user("u1", "a@b.com", Role::AgencyAdmin, Some("ag1")))
            .unwrap();
        db.upsert_sub_account_with_defaults(&sample_sub_account("sa1", "ag1"), "a@b.com")
            .unwrap();
        insert_bare_sub_account(&db, "sa2", "ag1");

        let resolved = resolve_current_user(&db, Some(&principal("a@b.com")))
            .unwrap()
            .expect("user exists");
        assert_eq!(resolved.user.id, "u1");
        assert_eq!(resolved.permissions.len(), 1);
        assert_eq!(resolved.permissions[0].sub_account_id, "sa1");
        let agency = resolved.agency.expect("agency loaded");
        assert_eq!(agency.agency.id, "ag1");
        assert_eq!(agency.sub_accounts.len(), 2);

        let by_id = get_user(&db, "u1").unwrap().unwrap();
        assert_eq!(by_id.user.email, "a@b.com");
        assert!(get_user(&db, "nope").unwrap().is_none());
    }

    #[test]
    fn test_update_user_validates_and_reports_missing() {
        let db = test_db();
        let mut user = sample_user("u1", "a@b.com", Role::SubaccountGuest, None);
        db.insert_user(&user).unwrap();

        user.role = Role::SubaccountUser;
        let updated = update_user(&db, &user).unwrap();
        assert_eq!(updated.role, Role::SubaccountUser);

        user.name = "x".into();
        assert!(matches!(
            update_user(&db, &user),
            Err(ServiceError::Validation { field: "name", .. })
        ));

        let ghost = sample_user("ghost", "g@b.com", Role::SubaccountUser, None);
        assert!(matches!(
            update_user(&db, &ghost),
            Err(ServiceError::NotFound { entity: "User", .. })
        ));
    }

    #[test]
    fn test_team_members() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        db.insert_user(&sample_user("u1", "a@b.com", Role::AgencyOwner, Some("ag1")))
            .unwrap();
        assert_eq!(get_team_members(&db, "ag1").unwrap().len(), 1);
        assert!(get_team_members(&db, "ag2").unwrap().is_empty());
    }
}
