// Activity log service: append entries for the acting user, read an agency's log.

use crate::db::{DashboardDb, DbNotification};
use crate::error::ServiceError;
use crate::types::Principal;

/// Append an activity-log entry attributed to the signed-in user.
///
/// Returns `Ok(None)` without writing when nobody is signed in or the
/// principal has no user row. When only `sub_account_id` is given, the
/// entry is filed under that sub-account's agency.
pub fn save_activity_log_notification(
    db: &DashboardDb,
    principal: Option<&Principal>,
    agency_id: Option<&str>,
    sub_account_id: Option<&str>,
    message: &str,
) -> Result<Option<DbNotification>, ServiceError> {
    let Some(principal) = principal else {
        log::debug!("Skipping activity log entry: nobody signed in");
        return Ok(None);
    };
    let Some(user) = db.get_user_by_email(&principal.email)? else {
        log::debug!("Skipping activity log entry: no user for {}", principal.email);
        return Ok(None);
    };
    record_activity(db, &user.id, agency_id, sub_account_id, message).map(Some)
}

/// Append an activity-log entry for a known user id.
pub(crate) fn record_activity(
    db: &DashboardDb,
    user_id: &str,
    agency_id: Option<&str>,
    sub_account_id: Option<&str>,
    message: &str,
) -> Result<DbNotification, ServiceError> {
    let agency_id = match (agency_id, sub_account_id) {
        (Some(agency_id), _) => agency_id.to_string(),
        (None, Some(sub_id)) => {
            db.get_sub_account(sub_id)?
                .ok_or_else(|| ServiceError::NotFound {
                    entity: "SubAccount",
                    id: sub_id.to_string(),
                })?
                .agency_id
        }
        (None, None) => return Err(ServiceError::MissingNotificationTarget),
    };
    Ok(db.append_notification(&agency_id, sub_account_id, user_id, message)?)
}

/// An agency's activity log, newest first.
pub fn get_notifications(
    db: &DashboardDb,
    agency_id: &str,
) -> Result<Vec<DbNotification>, ServiceError> {
    Ok(db.get_notifications_for_agency(agency_id)?)
}
