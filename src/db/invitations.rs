use super::*;
use crate::types::{InvitationStatus, Role};

impl DashboardDb {
    // =========================================================================
    // Invitations
    // =========================================================================

    pub fn insert_invitation(&self, invitation: &DbInvitation) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO invitations (id, email, agency_id, status, role)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                invitation.id,
                invitation.email,
                invitation.agency_id,
                invitation.status.as_str(),
                invitation.role.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Any invitation for this email, whatever its status.
    pub fn get_invitation_by_email(&self, email: &str) -> Result<Option<DbInvitation>, DbError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, email, agency_id, status, role FROM invitations
                 WHERE email = ?1 LIMIT 1",
                params![email],
                Self::map_invitation_row,
            )
            .optional()?)
    }

    pub fn get_pending_invitation(&self, email: &str) -> Result<Option<DbInvitation>, DbError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, email, agency_id, status, role FROM invitations
                 WHERE email = ?1 AND status = ?2 LIMIT 1",
                params![email, InvitationStatus::Pending.as_str()],
                Self::map_invitation_row,
            )
            .optional()?)
    }

    #[cfg(test)]
    pub fn get_invitations_for_agency(
        &self,
        agency_id: &str,
    ) -> Result<Vec<DbInvitation>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, agency_id, status, role FROM invitations
             WHERE agency_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![agency_id], Self::map_invitation_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn delete_invitation(&self, id: &str) -> Result<bool, DbError> {
        let rows = self
            .conn
            .execute("DELETE FROM invitations WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn map_invitation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbInvitation> {
        let status: String = row.get(3)?;
        let role: String = row.get(4)?;
        Ok(DbInvitation {
            id: row.get(0)?,
            email: row.get(1)?,
            agency_id: row.get(2)?,
            status: InvitationStatus::from_str_lossy(&status),
            role: Role::from_str_lossy(&role),
        })
    }
}
