use crate::domain;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// DTO for a constructed user
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct User {
    #[schema(example = 4)]
    pub user_id: i32,
    #[schema(example = "John Doe")]
    pub user_name: String,
    #[schema(example = "Approver")]
    pub role: String,
}

impl From<domain::user::User> for User {
    fn from(value: domain::user::User) -> Self {
        User {
            user_id: value.user_id,
            user_name: value.user_name,
            role: value.role,
        }
    }
}

/// DTO for creating a new user via the API
#[derive(Deserialize, Display, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[display("{name} ({role})")]
#[cfg_attr(test, derive(Serialize, Debug))]
pub struct NewUser {
    #[schema(example = 4)]
    pub user_id: i32,
    #[serde(alias = "userName")]
    #[validate(length(min = 1))]
    #[schema(example = "John Doe")]
    pub name: String,
    #[validate(length(min = 1))]
    #[schema(example = "Approver")]
    pub role: String,
}

impl From<NewUser> for domain::user::CreateUser {
    fn from(value: NewUser) -> Self {
        domain::user::CreateUser {
            user_id: value.user_id,
            user_name: value.name,
            role: value.role,
        }
    }
}
