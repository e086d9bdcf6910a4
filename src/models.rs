/// Persistent entities and their request/response shapes

use serde::{Deserialize, Serialize};

/// A stored user account.
///
/// Deliberately not `Serialize`: anything that leaves the server goes
/// through [`UserResponse`], which has no password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub location: Option<String>,
    pub organization: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
}

/// Registration payload
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub location: Option<String>,
    pub organization: Option<String>,
    pub full_name: Option<String>,
}

/// Partial profile update. A `None` field is left untouched.
///
/// An explicit JSON `null` deserializes to `None` as well, so `full_name`,
/// `location` and `organization` cannot be cleared once set.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub location: Option<String>,
    pub organization: Option<String>,
}

impl UserUpdate {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(full_name) = &self.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
        }
        if let Some(organization) = &self.organization {
            user.organization = Some(organization.clone());
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordUpdate {
    pub old_password: String,
    pub new_password: String,
}

/// Public view of a user with the resources it owns
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub location: Option<String>,
    pub organization: Option<String>,
    pub is_active: bool,
    pub items: Vec<Item>,
    pub nosql_collections: Vec<NoSqlCollection>,
    pub projects: Vec<Project>,
}

impl UserResponse {
    pub fn new(
        user: User,
        items: Vec<Item>,
        nosql_collections: Vec<NoSqlCollection>,
        projects: Vec<Project>,
    ) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            location: user.location,
            organization: user.organization,
            is_active: user.is_active,
            items,
            nosql_collections,
            projects,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NoSqlCollection {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub collection_path: Option<String>,
    pub owner_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewNoSqlCollection {
    pub name: String,
    pub description: Option<String>,
    pub collection_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workflow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub project_id: i64,
    pub owner_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub project_id: i64,
}
