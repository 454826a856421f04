use crate::types::inventory::{Item, Stats, User};

use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "landing.html")]
pub(crate) struct LandingTemplate {
    pub(crate) app_name: String,
    pub(crate) signed_in: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub(crate) struct DashboardTemplate {
    pub(crate) app_name: String,
    pub(crate) admin_name: String,
    pub(crate) stats: Stats,
}

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub(crate) struct RegisterTemplate {
    pub(crate) app_name: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub(crate) struct LoginTemplate {
    pub(crate) app_name: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "inventory.html")]
pub(crate) struct InventoryTemplate {
    pub(crate) app_name: String,
    pub(crate) items: Vec<Item>,
}

#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
pub(crate) struct UsersTemplate {
    pub(crate) app_name: String,
    pub(crate) users: Vec<User>,
}

#[derive(Template, WebTemplate)]
#[template(path = "loans.html")]
pub(crate) struct LoansTemplate {
    pub(crate) app_name: String,
    pub(crate) items: Vec<LoanRow>,
    pub(crate) users: Vec<User>,
}

pub(crate) struct LoanRow {
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) lent: bool,
    /// Borrower name, or `#id` when the user no longer exists.
    pub(crate) borrower: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "stats.html")]
pub(crate) struct StatsTemplate {
    pub(crate) app_name: String,
    pub(crate) stats: Stats,
}
