use super::*;

impl DashboardDb {
    // =========================================================================
    // Activity log
    // =========================================================================

    /// Append an activity-log entry. Entries are never updated or deleted here.
    pub fn append_notification(
        &self,
        agency_id: &str,
        sub_account_id: Option<&str>,
        user_id: &str,
        message: &str,
    ) -> Result<DbNotification, DbError> {
        let now = Self::now();
        let notification = DbNotification {
            id: Self::new_id(),
            notification: message.to_string(),
            agency_id: agency_id.to_string(),
            sub_account_id: sub_account_id.map(str::to_string),
            user_id: user_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO notifications (
                id, notification, agency_id, sub_account_id, user_id, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                notification.id,
                notification.notification,
                notification.agency_id,
                notification.sub_account_id,
                notification.user_id,
                notification.created_at,
                notification.updated_at,
            ],
        )?;
        Ok(notification)
    }

    /// Activity log for an agency, newest first.
    pub fn get_notifications_for_agency(
        &self,
        agency_id: &str,
    ) -> Result<Vec<DbNotification>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, notification, agency_id, sub_account_id, user_id, created_at, updated_at
             FROM notifications WHERE agency_id = ?1 ORDER BY rowid DESC",
        )?;
        let rows = stmt.query_map(params![agency_id], |row| {
            Ok(DbNotification {
                id: row.get(0)?,
                notification: row.get(1)?,
                agency_id: row.get(2)?,
                sub_account_id: row.get(3)?,
                user_id: row.get(4)?,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_utils::*;
    use crate::types::Role;

    #[test]
    fn test_append_and_list_newest_first() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        insert_bare_sub_account(&db, "sa1", "ag1");
        db.insert_user(&sample_user("u1", "a@b.com", Role::AgencyOwner, Some("ag1")))
            .unwrap();

        db.append_notification("ag1", None, "u1", "first").unwrap();
        let second = db.append_notification("ag1", Some("sa1"), "u1", "second").unwrap();
        assert_eq!(second.sub_account_id.as_deref(), Some("sa1"));

        let log = db.get_notifications_for_agency("ag1").unwrap();
        let messages: Vec<_> = log.iter().map(|n| n.notification.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }
}
