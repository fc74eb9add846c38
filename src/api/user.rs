use crate::domain::user::driving_ports::UserError;
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    Envelope, GenericErrorResponse, Json, NotFoundResponse, Path, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::get;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(get_users, create_user, get_user, delete_user))]
/// Defines the OpenAPI documentation for user endpoints
pub struct UsersApi;
/// Used to group user endpoints together in the OpenAPI documentation
pub const USER_API_GROUP: &str = "Users";

/// Builds a router for all the user routes
pub fn user_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let user_service = domain::user::UserService {};
                let user_reader = persistence::db_user_driven_ports::DbReadUsers;

                get_users(&mut ext_cxn, &user_service, &user_reader).await
            })
            .post(
                |State(app_state): AppState, Json(new_user): Json<dto::user::NewUser>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};
                    let user_writer = persistence::db_user_driven_ports::DbWriteUsers;

                    create_user(new_user, &mut ext_cxn, &user_service, &user_writer).await
                },
            ),
        )
        .route(
            "/:user_id",
            get(
                |State(app_state): AppState, Path(user_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};
                    let user_reader = persistence::db_user_driven_ports::DbReadUsers;

                    get_user(user_id, &mut ext_cxn, &user_service, &user_reader).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(user_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};
                    let user_writer = persistence::db_user_driven_ports::DbWriteUsers;

                    delete_user(user_id, &mut ext_cxn, &user_service, &user_writer).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = USER_API_GROUP,
    responses(
        (status = 200, description = "List of users, wrapped in the response envelope", body = UserListEnvelope),
        (status = 500, description = "Users could not be read", body = MessageEnvelope),
    ),
)]
/// Retrieves a list of all the users in the system.
async fn get_users(
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl domain::user::driving_ports::UserPort,
    user_reader: &impl domain::user::driven_ports::UserReader,
) -> Result<Envelope<Vec<dto::user::User>>, ErrorResponse> {
    info!("Requested users");
    let users = user_service
        .get_users(ext_cxn, user_reader)
        .await
        .map_err(|err| GenericErrorResponse::new("Error retrieving users", err))?;

    Ok(Envelope::ok(
        "Users retrieved successfully",
        users.into_iter().map(dto::user::User::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/user",
    tag = USER_API_GROUP,
    request_body = NewUser,
    responses(
        (status = 200, description = "User created", body = UserEnvelope),
        (status = 400, description = "Invalid user fields", body = ValidationErrorEnvelope),
        (status = 500, description = "The user could not be stored, for example because the ID is taken", body = MessageEnvelope),
    ),
)]
/// Creates a user.
async fn create_user(
    new_user: dto::user::NewUser,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl domain::user::driving_ports::UserPort,
    user_writer: &impl domain::user::driven_ports::UserWriter,
) -> Result<Envelope<dto::user::User>, ErrorResponse> {
    info!("Attempt to create user: {new_user}");
    new_user.validate().map_err(ValidationErrorResponse::from)?;

    let domain_user = domain::user::CreateUser::from(new_user);
    let created_user = user_service
        .create_user(&domain_user, ext_cxn, user_writer)
        .await
        .map_err(|err| GenericErrorResponse::new("Error creating user", err))?;

    Ok(Envelope::ok("User created successfully", created_user.into()))
}

#[utoipa::path(
    get,
    path = "/api/user/{user_id}",
    tag = USER_API_GROUP,
    params(
        ("user_id" = i32, Path, description = "The ID of the user to retrieve"),
    ),
    responses(
        (status = 200, description = "The requested user", body = UserEnvelope),
        (status = 404, description = "User not found", body = MessageEnvelope,
            example = json!({ "statusCode": 404, "message": "User not found", "data": null })),
        (status = 500, description = "The user could not be read", body = MessageEnvelope),
    ),
)]
/// Retrieves a specific user
async fn get_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl domain::user::driving_ports::UserPort,
    user_reader: &impl domain::user::driven_ports::UserReader,
) -> Result<Envelope<dto::user::User>, ErrorResponse> {
    info!("Get user {user_id}");
    match user_service.get_user(user_id, ext_cxn, user_reader).await {
        Ok(user) => Ok(Envelope::ok("User retrieved successfully", user.into())),
        Err(UserError::UserDoesNotExist(_)) => Err(NotFoundResponse("User not found").into()),
        Err(err) => Err(GenericErrorResponse::new("Error retrieving user", err).into()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/user/{user_id}",
    tag = USER_API_GROUP,
    params(
        ("user_id" = i32, Path, description = "The ID of the user to remove"),
    ),
    responses(
        (status = 200, description = "User removed along with their assignments. The envelope carries no data", body = MessageEnvelope),
        (status = 404, description = "User not found", body = MessageEnvelope),
        (status = 500, description = "The user could not be removed", body = MessageEnvelope),
    ),
)]
/// Removes a user
async fn delete_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl domain::user::driving_ports::UserPort,
    user_writer: &impl domain::user::driven_ports::UserWriter,
) -> Result<Envelope<()>, ErrorResponse> {
    info!("Removing user {user_id}");
    match user_service.delete_user(user_id, ext_cxn, user_writer).await {
        Ok(()) => Ok(Envelope::ok_empty("Removed User successfully")),
        Err(UserError::UserDoesNotExist(_)) => Err(NotFoundResponse("User not found").into()),
        Err(err) => Err(GenericErrorResponse::new("Error removing user", err).into()),
    }
}
