use crate::domain::user::driving_ports::UserError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use thiserror::Error;
use tracing::error;

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct User {
    pub user_id: i32,
    pub user_name: String,
    pub role: String,
}

#[cfg_attr(test, derive(Clone))]
pub struct CreateUser {
    pub user_id: i32,
    pub user_name: String,
    pub role: String,
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    pub trait UserReader {
        async fn get_all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<User>, anyhow::Error>;
        async fn get_by_id(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<User>, anyhow::Error>;
    }

    pub trait UserWriter {
        async fn create_user(
            &self,
            user: &CreateUser,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<User, anyhow::Error>;

        /// Removes a user, returning false if there was no user to remove
        async fn delete_user(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }

    /// Existence check used before writing rows that reference the user. When `ext_cxn` is
    /// in a transaction, a user that exists cannot be deleted until that transaction ends.
    pub trait DetectUser {
        async fn user_exists(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    #[derive(Debug, Error)]
    pub enum UserError {
        #[error("user {0} does not exist")]
        UserDoesNotExist(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    pub trait UserPort {
        async fn get_users(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Vec<User>, anyhow::Error>;
        async fn get_user(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<User, UserError>;
        async fn create_user(
            &self,
            new_user: &CreateUser,
            ext_cxn: &mut impl ExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
        ) -> Result<User, anyhow::Error>;
        async fn delete_user(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
        ) -> Result<(), UserError>;
    }
}

pub struct UserService {}

#[derive(Debug, Error)]
pub(super) enum UserExistsErr {
    #[error("user with ID {0} does not exist")]
    UserDoesNotExist(i32),

    #[error(transparent)]
    PortError(#[from] anyhow::Error),
}

pub(super) async fn verify_user_exists(
    id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_detect: &impl driven_ports::DetectUser,
) -> Result<(), UserExistsErr> {
    let does_user_exist = user_detect.user_exists(id, ext_cxn).await?;

    if does_user_exist {
        Ok(())
    } else {
        Err(UserExistsErr::UserDoesNotExist(id))
    }
}


impl driving_ports::UserPort for UserService {
    async fn get_users(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Vec<User>, anyhow::Error> {
        let all_users_result = u_reader.get_all(ext_cxn).await;
        if let Err(ref port_err) = all_users_result {
            error!("User fetch failure: {port_err}");
        }

        all_users_result.context("Failed fetching users")
    }

    async fn get_user(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<User, UserError> {
        u_reader
            .get_by_id(user_id, ext_cxn)
            .await
            .context("Fetching user by ID")?
            .ok_or(UserError::UserDoesNotExist(user_id))
    }

    async fn create_user(
        &self,
        new_user: &CreateUser,
        ext_cxn: &mut impl ExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
    ) -> Result<User, anyhow::Error> {
        u_writer
            .create_user(new_user, ext_cxn)
            .await
            .context("Trying to create user at service level")
    }

    async fn delete_user(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
    ) -> Result<(), UserError> {
        let was_deleted = u_writer
            .delete_user(user_id, ext_cxn)
            .await
            .context("deleting a user")?;

        if !was_deleted {
            return Err(UserError::UserDoesNotExist(user_id));
        }

        Ok(())
    }
}
