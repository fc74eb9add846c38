use super::test_util::{app_router, prepare_db_and_test, send};
use axum::http::StatusCode;
use serde_json::json;

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn can_create_and_remove_user() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);

        let (status, body) = send(
            &router,
            "POST",
            "/api/user",
            Some(json!({ "userId": 4, "userName": "John Doe", "role": "Approver" })),
        )
        .await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!("User created successfully"), body["message"]);
        assert_eq!(
            json!({ "userId": 4, "userName": "John Doe", "role": "Approver" }),
            body["data"]
        );

        let (status, body) = send(&router, "GET", "/api/user", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(
            json!([{ "userId": 4, "userName": "John Doe", "role": "Approver" }]),
            body["data"]
        );

        let (status, body) = send(&router, "DELETE", "/api/user/4", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!("Removed User successfully"), body["message"]);

        let (status, body) = send(&router, "GET", "/api/user/4", None).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!(json!("User not found"), body["message"]);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn removing_user_removes_their_assignments() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);

        let (status, _) = send(
            &router,
            "POST",
            "/api/invoice",
            Some(json!({
                "invoiceId": 1,
                "pmc": "P1",
                "siteName": "S1",
                "vendorName": "V1",
                "priorBalance": 12.5,
            })),
        )
        .await;
        assert_eq!(StatusCode::OK, status);

        let (status, _) = send(
            &router,
            "POST",
            "/api/user",
            Some(json!({ "userId": 4, "name": "John Doe", "role": "Approver" })),
        )
        .await;
        assert_eq!(StatusCode::OK, status);

        let (status, _) = send(
            &router,
            "POST",
            "/api/invoice/assign",
            Some(json!({ "invoiceId": 1, "userId": 4 })),
        )
        .await;
        assert_eq!(StatusCode::OK, status);

        let (status, _) = send(&router, "DELETE", "/api/user/4", None).await;
        assert_eq!(StatusCode::OK, status);

        let (_, body) = send(&router, "GET", "/api/invoice/assignments", None).await;
        assert_eq!(json!([{ "invoiceId": 1, "userId": null }]), body["data"]);
    });
}
