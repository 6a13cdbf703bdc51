//! Fixed children seeded when an agency or sub-account is first created.

/// Name of the pipeline every new sub-account starts with.
pub const DEFAULT_PIPELINE_NAME: &str = "Lead Cycle";

/// A navigation entry template. `link` contains `{id}`, replaced by the
/// owner's id when seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarTemplate {
    pub name: &'static str,
    pub icon: &'static str,
    pub link: &'static str,
}

impl SidebarTemplate {
    pub fn link_for(&self, owner_id: &str) -> String {
        self.link.replace("{id}", owner_id)
    }
}

const fn entry(name: &'static str, icon: &'static str, link: &'static str) -> SidebarTemplate {
    SidebarTemplate { name, icon, link }
}

pub const AGENCY_SIDEBAR: [SidebarTemplate; 6] = [
    entry("Dashboard", "category", "/agency/{id}"),
    entry("Launchpad", "clipboardIcon", "/agency/{id}/launchpad"),
    entry("Billing", "payment", "/agency/{id}/billing"),
    entry("Settings", "settings", "/agency/{id}/settings"),
    entry("Sub Accounts", "person", "/agency/{id}/all-subaccounts"),
    entry("Team", "shield", "/agency/{id}/team"),
];

pub const SUB_ACCOUNT_SIDEBAR: [SidebarTemplate; 8] = [
    entry("Launchpad", "clipboardIcon", "/subaccount/{id}/launchpad"),
    entry("Settings", "settings", "/subaccount/{id}/settings"),
    entry("Funnels", "pipelines", "/subaccount/{id}/funnels"),
    entry("Media", "database", "/subaccount/{id}/media"),
    entry("Automations", "chip", "/subaccount/{id}/automations"),
    entry("Pipelines", "flag", "/subaccount/{id}/pipelines"),
    entry("Contacts", "person", "/subaccount/{id}/contacts"),
    entry("Dashboard", "category", "/subaccount/{id}"),
];
