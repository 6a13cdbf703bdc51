use super::*;

impl DashboardDb {
    // =========================================================================
    // Media library
    // =========================================================================

    pub fn insert_media(&self, media: &DbMedia) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO media (id, media_type, name, link, sub_account_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                media.id,
                media.media_type,
                media.name,
                media.link,
                media.sub_account_id,
                media.created_at,
                media.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_media(&self, id: &str) -> Result<Option<DbMedia>, DbError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, media_type, name, link, sub_account_id, created_at, updated_at
                 FROM media WHERE id = ?1",
                params![id],
                Self::map_media_row,
            )
            .optional()?)
    }

    /// Media of a sub-account, newest first.
    pub fn get_media_for_sub_account(&self, sub_account_id: &str) -> Result<Vec<DbMedia>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, media_type, name, link, sub_account_id, created_at, updated_at
             FROM media WHERE sub_account_id = ?1 ORDER BY rowid DESC",
        )?;
        let rows = stmt.query_map(params![sub_account_id], Self::map_media_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn delete_media(&self, id: &str) -> Result<bool, DbError> {
        let rows = self
            .conn
            .execute("DELETE FROM media WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn map_media_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbMedia> {
        Ok(DbMedia {
            id: row.get(0)?,
            media_type: row.get(1)?,
            name: row.get(2)?,
            link: row.get(3)?,
            sub_account_id: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}
