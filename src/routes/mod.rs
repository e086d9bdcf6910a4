mod collections;
mod health_check;
mod items;
mod projects;
mod token;
mod users;
mod workflows;

pub use collections::{create_collection_for_current_user, list_collections};
pub use health_check::health_check;
pub use items::{create_item_for_current_user, create_item_for_user, list_items};
pub use projects::{create_project_for_current_user, list_projects};
pub use token::{login_for_access_token, LoginForm, TokenResponse};
pub use users::{
    create_user, delete_user, get_user, list_users, update_user, update_user_password, whoami,
};
pub use workflows::{create_workflow_for_current_user, list_workflows};

use serde::Deserialize;

const DEFAULT_PAGE_LIMIT: i64 = 100;

/// `?skip=&limit=` query parameters shared by the list endpoints
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl Pagination {
    /// Negative values would mean "no limit" to SQLite
    pub fn bounds(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.max(0))
    }
}
