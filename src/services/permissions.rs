// Permissions service: grant or revoke a user's access to a sub-account.

use crate::db::{DashboardDb, DbPermission};
use crate::error::ServiceError;

/// Flip `access` on the grant with `permission_id`, or create a new grant
/// for `(email, sub_account_id)` when no id is given or it matches nothing.
///
/// Grants are keyed by id only. Calling without the stored id for a pair
/// that already has a grant creates a second grant.
pub fn set_permission(
    db: &DashboardDb,
    permission_id: Option<&str>,
    access: bool,
    email: &str,
    sub_account_id: &str,
) -> Result<DbPermission, ServiceError> {
    let id = match permission_id.filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => DashboardDb::new_id(),
    };
    db.upsert_permission(&DbPermission {
        id: id.clone(),
        email: email.to_string(),
        sub_account_id: sub_account_id.to_string(),
        access,
    })?;
    log::info!(
        "Permission {} for {} on {} set to {}",
        id,
        email,
        sub_account_id,
        access
    );
    db.get_permission(&id)?
        .ok_or(ServiceError::NotFound {
            entity: "Permission",
            id,
        })
}
