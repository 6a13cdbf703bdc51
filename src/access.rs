//! Role capabilities and permission-based visibility of sub-accounts.

use crate::db::SubAccountWithPermissions;
use crate::types::Role;

pub fn can_delete_sub_account(role: Role) -> bool {
    matches!(role, Role::AgencyOwner)
}

pub fn can_delete_agency(role: Role) -> bool {
    matches!(role, Role::AgencyOwner)
}

pub fn can_manage_permissions(role: Role) -> bool {
    matches!(role, Role::AgencyOwner | Role::AgencyAdmin)
}

pub fn can_manage_team(role: Role) -> bool {
    matches!(role, Role::AgencyOwner | Role::AgencyAdmin)
}

/// Agency-level roles land on the agency dashboard; sub-account roles land
/// on a sub-account.
pub fn is_agency_level(role: Role) -> bool {
    matches!(role, Role::AgencyOwner | Role::AgencyAdmin)
}

/// Keep the sub-accounts that carry at least one grant for `email`.
///
/// A grant's presence is what makes a sub-account visible; its `access` flag
/// is not consulted. Input order is preserved.
pub fn scope_sub_accounts(
    sub_accounts: Vec<SubAccountWithPermissions>,
    email: &str,
) -> Vec<SubAccountWithPermissions> {
    sub_accounts
        .into_iter()
        .filter(|sub| sub.permissions.iter().any(|p| p.email == email))
        .collect()
}
