use super::*;
use crate::defaults::SidebarTemplate;

/// Which navigation table a set of entries belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarOwner {
    Agency,
    SubAccount,
}

impl SidebarOwner {
    fn table(&self) -> &'static str {
        match self {
            SidebarOwner::Agency => "agency_sidebar_options",
            SidebarOwner::SubAccount => "sub_account_sidebar_options",
        }
    }

    fn owner_column(&self) -> &'static str {
        match self {
            SidebarOwner::Agency => "agency_id",
            SidebarOwner::SubAccount => "sub_account_id",
        }
    }
}

impl DashboardDb {
    // =========================================================================
    // Navigation entries
    // =========================================================================

    /// Insert one navigation entry per template, links interpolated with
    /// `owner_id`. Entries keep template order.
    pub fn seed_sidebar_options(
        &self,
        owner: SidebarOwner,
        owner_id: &str,
        templates: &[SidebarTemplate],
    ) -> Result<Vec<DbSidebarOption>, DbError> {
        let sql = format!(
            "INSERT INTO {} (id, name, link, icon, position, {}, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            owner.table(),
            owner.owner_column()
        );
        let now = Self::now();
        let mut stmt = self.conn.prepare(&sql)?;
        let mut created = Vec::with_capacity(templates.len());
        for (position, template) in templates.iter().enumerate() {
            let option = DbSidebarOption {
                id: Self::new_id(),
                name: template.name.to_string(),
                link: template.link_for(owner_id),
                icon: template.icon.to_string(),
                owner_id: owner_id.to_string(),
                created_at: now.clone(),
                updated_at: now.clone(),
            };
            stmt.execute(params![
                option.id,
                option.name,
                option.link,
                option.icon,
                position as i64,
                option.owner_id,
                now,
            ])?;
            created.push(option);
        }
        Ok(created)
    }

    /// Navigation entries for an owner, in seeded order.
    pub fn get_sidebar_options(
        &self,
        owner: SidebarOwner,
        owner_id: &str,
    ) -> Result<Vec<DbSidebarOption>, DbError> {
        let sql = format!(
            "SELECT id, name, link, icon, {}, created_at, updated_at
             FROM {} WHERE {} = ?1 ORDER BY position",
            owner.owner_column(),
            owner.table(),
            owner.owner_column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner_id], |row| {
            Ok(DbSidebarOption {
                id: row.get(0)?,
                name: row.get(1)?,
                link: row.get(2)?,
                icon: row.get(3)?,
                owner_id: row.get(4)?,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
