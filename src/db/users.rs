use super::*;
use crate::types::Role;

const USER_COLUMNS: &str =
    "id, name, avatar_url, email, role, agency_id, created_at, updated_at";

impl DashboardDb {
    // =========================================================================
    // Users
    // =========================================================================

    pub fn insert_user(&self, user: &DbUser) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO users (id, name, avatar_url, email, role, agency_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.id,
                user.name,
                user.avatar_url,
                user.email,
                user.role.as_str(),
                user.agency_id,
                user.created_at,
                user.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Overwrite a user's profile fields and role. Returns `false` when no
    /// user has that id.
    pub fn update_user(&self, user: &DbUser) -> Result<bool, DbError> {
        let rows = self.conn.execute(
            "UPDATE users SET name = ?2, avatar_url = ?3, email = ?4, role = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                user.id,
                user.name,
                user.avatar_url,
                user.email,
                user.role.as_str(),
                Self::now(),
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<DbUser>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], Self::map_user_row)
            .optional()?)
    }

    /// First user whose email matches exactly.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 LIMIT 1");
        Ok(self
            .conn
            .query_row(&sql, params![email], Self::map_user_row)
            .optional()?)
    }

    /// Team members of an agency, ordered by name.
    pub fn get_users_for_agency(&self, agency_id: &str) -> Result<Vec<DbUser>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE agency_id = ?1 ORDER BY name");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![agency_id], Self::map_user_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Load a user with its permission grants and its agency (with the
    /// agency's sub-accounts).
    pub fn load_user_access(&self, user: DbUser) -> Result<UserWithAccess, DbError> {
        let permissions = self.get_permissions_for_email(&user.email)?;
        let agency = match user.agency_id.as_deref() {
            Some(agency_id) => match self.get_agency(agency_id)? {
                Some(agency) => {
                    let sub_accounts = self.get_sub_accounts_for_agency(&agency.id)?;
                    Some(AgencyWithSubAccounts {
                        agency,
                        sub_accounts,
                    })
                }
                None => None,
            },
            None => None,
        };
        Ok(UserWithAccess {
            user,
            permissions,
            agency,
        })
    }

    fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbUser> {
        let role: String = row.get(4)?;
        Ok(DbUser {
            id: row.get(0)?,
            name: row.get(1)?,
            avatar_url: row.get(2)?,
            email: row.get(3)?,
            role: Role::from_str_lossy(&role),
            agency_id: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::*;

    #[test]
    fn test_insert_and_lookup_by_email() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        let user = sample_user("u1", "a@b.com", Role::AgencyAdmin, Some("ag1"));
        db.insert_user(&user).expect("insert");

        assert_eq!(db.get_user_by_email("a@b.com").unwrap(), Some(user.clone()));
        assert_eq!(db.get_user("u1").unwrap(), Some(user));
        assert!(db.get_user_by_email("nobody@b.com").unwrap().is_none());
    }

    #[test]
    fn test_update_user_overwrites_profile_and_role() {
        let db = test_db();
        let mut user = sample_user("u1", "a@b.com", Role::SubaccountGuest, None);
        db.insert_user(&user).unwrap();

        user.name = "Renamed".into();
        user.role = Role::SubaccountUser;
        assert!(db.update_user(&user).unwrap());

        let stored = db.get_user("u1").unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.role, Role::SubaccountUser);

        let ghost = sample_user("ghost", "g@b.com", Role::SubaccountUser, None);
        assert!(!db.update_user(&ghost).unwrap());
    }

    #[test]
    fn test_load_user_access_without_agency() {
        let db = test_db();
        let user = sample_user("u1", "a@b.com", Role::AgencyOwner, None);
        db.insert_user(&user).unwrap();

        let loaded = db.load_user_access(user).unwrap();
        assert!(loaded.agency.is_none());
        assert!(loaded.permissions.is_empty());
    }

    #[test]
    fn test_users_for_agency_sorted_by_name() {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        let mut zed = sample_user("u1", "z@b.com", Role::AgencyAdmin, Some("ag1"));
        zed.name = "Zed".into();
        let mut amy = sample_user("u2", "amy@b.com", Role::SubaccountUser, Some("ag1"));
        amy.name = "Amy".into();
        db.insert_user(&zed).unwrap();
        db.insert_user(&amy).unwrap();
        db.insert_user(&sample_user("u3", "x@b.com", Role::AgencyOwner, None))
            .unwrap();

        let team = db.get_users_for_agency("ag1").unwrap();
        let names: Vec<_> = team.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }
}
