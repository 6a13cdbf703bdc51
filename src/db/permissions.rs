use super::*;

impl DashboardDb {
    // =========================================================================
    // Permission grants
    // =========================================================================

    /// Insert a grant, or flip `access` on the grant that already has this id.
    ///
    /// Only the id is a dedup key. A second grant for the same
    /// (email, sub-account) pair under a different id is stored as-is.
    pub fn upsert_permission(&self, permission: &DbPermission) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO permissions (id, email, sub_account_id, access)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET access = excluded.access",
            params![
                permission.id,
                permission.email,
                permission.sub_account_id,
                permission.access as i32,
            ],
        )?;
        Ok(())
    }

    pub fn get_permission(&self, id: &str) -> Result<Option<DbPermission>, DbError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, email, sub_account_id, access FROM permissions WHERE id = ?1",
                params![id],
                Self::map_permission_row,
            )
            .optional()?)
    }

    pub fn get_permissions_for_email(&self, email: &str) -> Result<Vec<DbPermission>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, sub_account_id, access FROM permissions
             WHERE email = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![email], Self::map_permission_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_permissions_for_sub_account(
        &self,
        sub_account_id: &str,
    ) -> Result<Vec<DbPermission>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, sub_account_id, access FROM permissions
             WHERE sub_account_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![sub_account_id], Self::map_permission_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn map_permission_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbPermission> {
        Ok(DbPermission {
            id: row.get(0)?,
            email: row.get(1)?,
            sub_account_id: row.get(2)?,
            access: row.get::<_, i32>(3)? != 0,
        })
    }
}
