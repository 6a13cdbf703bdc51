use super::*;
use crate::db::sidebar::SidebarOwner;
use crate::defaults::{DEFAULT_PIPELINE_NAME, SUB_ACCOUNT_SIDEBAR};

const SUB_ACCOUNT_COLUMNS: &str = "id, connect_account_id, name, sub_account_logo,
     company_email, company_phone, goal, address, city, zip_code, state, country,
     agency_id, created_at, updated_at";

impl DashboardDb {
    // =========================================================================
    // Sub-accounts
    // =========================================================================

    /// Plain insert of the sub-account row, without any seeded children.
    pub fn insert_sub_account(&self, sub: &DbSubAccount) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO sub_accounts (
                id, connect_account_id, name, sub_account_logo, company_email,
                company_phone, goal, address, city, zip_code, state, country,
                agency_id, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                sub.id,
                sub.connect_account_id,
                sub.name,
                sub.sub_account_logo,
                sub.company_email,
                sub.company_phone,
                sub.goal,
                sub.address,
                sub.city,
                sub.zip_code,
                sub.state,
                sub.country,
                sub.agency_id,
                sub.created_at,
                sub.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Overwrite the sub-account's own scalar fields. Returns `false` when no
    /// sub-account has that id.
    pub fn update_sub_account_fields(&self, sub: &DbSubAccount) -> Result<bool, DbError> {
        let rows = self.conn.execute(
            "UPDATE sub_accounts SET
                connect_account_id = ?2, name = ?3, sub_account_logo = ?4,
                company_email = ?5, company_phone = ?6, goal = ?7, address = ?8,
                city = ?9, zip_code = ?10, state = ?11, country = ?12, agency_id = ?13,
                updated_at = ?14
             WHERE id = ?1",
            params![
                sub.id,
                sub.connect_account_id,
                sub.name,
                sub.sub_account_logo,
                sub.company_email,
                sub.company_phone,
                sub.goal,
                sub.address,
                sub.city,
                sub.zip_code,
                sub.state,
                sub.country,
                sub.agency_id,
                Self::now(),
            ],
        )?;
        Ok(rows > 0)
    }

    /// Create-or-update a sub-account.
    ///
    /// On create, eight navigation entries, the "Lead Cycle" pipeline, and an
    /// `access = true` grant for `creator_email` are written in the same
    /// immediate transaction as the row itself.
    pub fn upsert_sub_account_with_defaults(
        &self,
        sub: &DbSubAccount,
        creator_email: &str,
    ) -> Result<UpsertOutcome<SeededSubAccount>, DbError> {
        self.with_transaction(|tx| -> Result<_, DbError> {
            if tx.row_exists("sub_accounts", &sub.id)? {
                tx.update_sub_account_fields(sub)?;
                log::debug!("Sub-account {} updated in place", sub.id);
                return Ok(UpsertOutcome::Updated);
            }

            tx.insert_sub_account(sub)?;
            let sidebar_options =
                tx.seed_sidebar_options(SidebarOwner::SubAccount, &sub.id, &SUB_ACCOUNT_SIDEBAR)?;
            let pipeline = tx.insert_pipeline(&sub.id, DEFAULT_PIPELINE_NAME)?;
            let permission = DbPermission {
                id: Self::new_id(),
                email: creator_email.to_string(),
                sub_account_id: sub.id.clone(),
                access: true,
            };
            tx.upsert_permission(&permission)?;

            log::info!(
                "Created sub-account {} under agency {} ({} navigation entries, pipeline '{}')",
                sub.id,
                sub.agency_id,
                sidebar_options.len(),
                pipeline.name
            );
            Ok(UpsertOutcome::Created(SeededSubAccount {
                sub_account: sub.clone(),
                sidebar_options,
                pipeline,
                permission,
            }))
        })
    }

    pub fn get_sub_account(&self, id: &str) -> Result<Option<DbSubAccount>, DbError> {
        let sql = format!("SELECT {SUB_ACCOUNT_COLUMNS} FROM sub_accounts WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], Self::map_sub_account_row)
            .optional()?)
    }

    /// Sub-accounts of an agency, in creation order.
    pub fn get_sub_accounts_for_agency(
        &self,
        agency_id: &str,
    ) -> Result<Vec<DbSubAccount>, DbError> {
        let sql = format!(
            "SELECT {SUB_ACCOUNT_COLUMNS} FROM sub_accounts
             WHERE agency_id = ?1 ORDER BY rowid"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![agency_id], Self::map_sub_account_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Sub-accounts of an agency, each with its permission grants.
    pub fn get_sub_accounts_with_permissions(
        &self,
        agency_id: &str,
    ) -> Result<Vec<SubAccountWithPermissions>, DbError> {
        self.get_sub_accounts_for_agency(agency_id)?
            .into_iter()
            .map(|sub_account| {
                let permissions = self.get_permissions_for_sub_account(&sub_account.id)?;
                Ok(SubAccountWithPermissions {
                    sub_account,
                    permissions,
                })
            })
            .collect()
    }

    /// Delete a sub-account. Permissions, navigation, pipelines and media
    /// cascade. Returns `false` when no sub-account had that id.
    pub fn delete_sub_account(&self, id: &str) -> Result<bool, DbError> {
        let rows = self
            .conn
            .execute("DELETE FROM sub_accounts WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // =========================================================================
    // Pipelines
    // =========================================================================

    pub fn insert_pipeline(&self, sub_account_id: &str, name: &str) -> Result<DbPipeline, DbError> {
        let now = Self::now();
        let pipeline = DbPipeline {
            id: Self::new_id(),
            name: name.to_string(),
            sub_account_id: sub_account_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO pipelines (id, name, sub_account_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                pipeline.id,
                pipeline.name,
                pipeline.sub_account_id,
                pipeline.created_at,
                pipeline.updated_at,
            ],
        )?;
        Ok(pipeline)
    }

    pub fn get_pipelines_for_sub_account(
        &self,
        sub_account_id: &str,
    ) -> Result<Vec<DbPipeline>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, sub_account_id, created_at, updated_at
             FROM pipelines WHERE sub_account_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![sub_account_id], |row| {
            Ok(DbPipeline {
                id: row.get(0)?,
                name: row.get(1)?,
                sub_account_id: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn map_sub_account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbSubAccount> {
        Ok(DbSubAccount {
            id: row.get(0)?,
            connect_account_id: row.get(1)?,
            name: row.get(2)?,
            sub_account_logo: row.get(3)?,
            company_email: row.get(4)?,
            company_phone: row.get(5)?,
            goal: row.get(6)?,
            address: row.get(7)?,
            city: row.get(8)?,
            zip_code: row.get(9)?,
            state: row.get(10)?,
            country: row.get(11)?,
            agency_id: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }
}
