use super::*;
use crate::db::sidebar::SidebarOwner;
use crate::defaults::AGENCY_SIDEBAR;
use crate::types::{Principal, Role};

const AGENCY_COLUMNS: &str = "id, connect_account_id, customer_id, name, agency_logo,
     company_email, company_phone, white_label, address, city, zip_code, state,
     country, goal, created_at, updated_at";

impl DashboardDb {
    // =========================================================================
    // Agencies
    // =========================================================================

    /// Plain insert of the agency row, without any seeded children.
    pub fn insert_agency(&self, agency: &DbAgency) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO agencies (
                id, connect_account_id, customer_id, name, agency_logo, company_email,
                company_phone, white_label, address, city, zip_code, state, country,
                goal, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                agency.id,
                agency.connect_account_id,
                agency.customer_id,
                agency.name,
                agency.agency_logo,
                agency.company_email,
                agency.company_phone,
                agency.white_label as i32,
                agency.address,
                agency.city,
                agency.zip_code,
                agency.state,
                agency.country,
                agency.goal,
                agency.created_at,
                agency.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Overwrite the agency's own scalar fields. Children and `created_at`
    /// are untouched. Returns `false` when no agency has that id.
    pub fn update_agency_fields(&self, agency: &DbAgency) -> Result<bool, DbError> {
        let rows = self.conn.execute(
            "UPDATE agencies SET
                connect_account_id = ?2, customer_id = ?3, name = ?4, agency_logo = ?5,
                company_email = ?6, company_phone = ?7, white_label = ?8, address = ?9,
                city = ?10, zip_code = ?11, state = ?12, country = ?13, goal = ?14,
                updated_at = ?15
             WHERE id = ?1",
            params![
                agency.id,
                agency.connect_account_id,
                agency.customer_id,
                agency.name,
                agency.agency_logo,
                agency.company_email,
                agency.company_phone,
                agency.white_label as i32,
                agency.address,
                agency.city,
                agency.zip_code,
                agency.state,
                agency.country,
                agency.goal,
                Self::now(),
            ],
        )?;
        Ok(rows > 0)
    }

    /// Create-or-update an agency.
    ///
    /// The existence probe, insert, and seeding all run in one immediate
    /// transaction: on create, six navigation entries and an owning user
    /// (role forced to `AGENCY_OWNER`) are written with the agency. An
    /// existing agency only has its scalar fields overwritten.
    pub fn upsert_agency_with_defaults(
        &self,
        agency: &DbAgency,
        owner: &Principal,
    ) -> Result<UpsertOutcome<SeededAgency>, DbError> {
        self.with_transaction(|tx| -> Result<_, DbError> {
            if tx.row_exists("agencies", &agency.id)? {
                tx.update_agency_fields(agency)?;
                log::debug!("Agency {} updated in place", agency.id);
                return Ok(UpsertOutcome::Updated);
            }

            tx.insert_agency(agency)?;
            let sidebar_options =
                tx.seed_sidebar_options(SidebarOwner::Agency, &agency.id, &AGENCY_SIDEBAR)?;

            let now = Self::now();
            let owner_user = DbUser {
                id: Self::new_id(),
                name: owner.full_name(),
                avatar_url: owner.image_url.clone(),
                email: owner.email.clone(),
                role: Role::AgencyOwner,
                agency_id: Some(agency.id.clone()),
                created_at: now.clone(),
                updated_at: now,
            };
            tx.insert_user(&owner_user)?;

            log::info!(
                "Created agency {} with {} navigation entries, owner {}",
                agency.id,
                sidebar_options.len(),
                owner_user.email
            );
            Ok(UpsertOutcome::Created(SeededAgency {
                agency: agency.clone(),
                users: vec![owner_user],
                sidebar_options,
            }))
        })
    }

    pub fn get_agency(&self, id: &str) -> Result<Option<DbAgency>, DbError> {
        let sql = format!("SELECT {AGENCY_COLUMNS} FROM agencies WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], Self::map_agency_row)
            .optional()?)
    }

    /// First agency that has at least one user with this email.
    pub fn get_agency_for_member_email(&self, email: &str) -> Result<Option<DbAgency>, DbError> {
        let sql = format!(
            "SELECT {AGENCY_COLUMNS} FROM agencies a
             WHERE EXISTS (SELECT 1 FROM users u WHERE u.agency_id = a.id AND u.email = ?1)
             LIMIT 1"
        );
        Ok(self
            .conn
            .query_row(&sql, params![email], Self::map_agency_row)
            .optional()?)
    }

    /// Delete an agency. Users, sub-accounts and everything below them
    /// cascade. Returns `false` when no agency had that id.
    pub fn delete_agency(&self, id: &str) -> Result<bool, DbError> {
        let rows = self
            .conn
            .execute("DELETE FROM agencies WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn map_agency_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbAgency> {
        Ok(DbAgency {
            id: row.get(0)?,
            connect_account_id: row.get(1)?,
            customer_id: row.get(2)?,
            name: row.get(3)?,
            agency_logo: row.get(4)?,
            company_email: row.get(5)?,
            company_phone: row.get(6)?,
            white_label: row.get::<_, i32>(7)? != 0,
            address: row.get(8)?,
            city: row.get(9)?,
            zip_code: row.get(10)?,
            state: row.get(11)?,
            country: row.get(12)?,
            goal: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }
}
