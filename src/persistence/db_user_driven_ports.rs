use crate::domain;
use crate::domain::user::{CreateUser, User};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

pub struct DbDetectUser;

impl domain::user::driven_ports::DetectUser for DbDetectUser {
    async fn user_exists(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        // Inside a transaction the lock keeps the row from being deleted until commit
        let locked_user = query("SELECT 1 FROM app_user au WHERE au.user_id = $1 FOR KEY SHARE")
            .bind(user_id)
            .fetch_optional(connection.borrow_connection())
            .await
            .context("Detecting user with ID")?;

        Ok(locked_user.is_some())
    }
}

#[derive(FromRow)]
struct AppUserRow {
    user_id: i32,
    user_name: String,
    role: String,
}

impl From<AppUserRow> for User {
    fn from(value: AppUserRow) -> Self {
        User {
            user_id: value.user_id,
            user_name: value.user_name,
            role: value.role,
        }
    }
}

pub struct DbReadUsers;

impl domain::user::driven_ports::UserReader for DbReadUsers {
    async fn get_all(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<User>, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let users: Vec<User> =
            query_as::<_, AppUserRow>("SELECT user_id, user_name, role FROM app_user ORDER BY user_id")
                .fetch_all(connection.borrow_connection())
                .await
                .context("Fetching all users")?
                .into_iter()
                .map(User::from)
                .collect();

        Ok(users)
    }

    async fn get_by_id(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<User>, Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let user = query_as::<_, AppUserRow>(
            "SELECT user_id, user_name, role FROM app_user au WHERE au.user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(cxn_handle.borrow_connection())
        .await
        .context("Fetching a user by id")?;

        Ok(user.map(User::from))
    }
}

pub struct DbWriteUsers;

impl domain::user::driven_ports::UserWriter for DbWriteUsers {
    async fn create_user(
        &self,
        user: &CreateUser,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<User, Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let user = query_as::<_, AppUserRow>(
            "INSERT INTO app_user(user_id, user_name, role) VALUES ($1, $2, $3) \
             RETURNING user_id, user_name, role",
        )
        .bind(user.user_id)
        .bind(&user.user_name)
        .bind(&user.role)
        .fetch_one(cxn_handle.borrow_connection())
        .await
        .context("Inserting new user")?;

        Ok(user.into())
    }

    async fn delete_user(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let delete_result = query("DELETE FROM app_user WHERE user_id = $1")
            .bind(user_id)
            .execute(cxn_handle.borrow_connection())
            .await
            .context("Removing a user from the database")?;

        Ok(delete_result.rows_affected() > 0)
    }
}
