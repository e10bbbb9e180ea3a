// Template context structures for the two server-rendered pages. Everything
// else the console consumes is JSON.

use actix_session::Session;
use askama::Template;

use crate::activity::Activity;
use crate::auth::csrf;
use crate::auth::session::{get_role, get_username, take_flash};
use crate::errors::AppError;
use crate::models::dashboard::DashboardStats;

/// Common context shared by authenticated pages.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub role: String,
    pub flash: Option<String>,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session) -> Result<Self, AppError> {
        let username = get_username(session)?;
        let role = get_role(session)?;
        let flash = take_flash(session);
        let csrf_token = csrf::token_for(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            role,
            flash,
            csrf_token,
        })
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub stats: DashboardStats,
    pub recent_activity: Vec<Activity>,
}
