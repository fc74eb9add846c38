use super::test_util::{app_router, prepare_db_and_test, send};
use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Parses JSON text without going through `f64`, so decimal numbers keep their exact digits
fn exact_json(text: &str) -> Value {
    serde_json::from_str(text).expect("test JSON should parse")
}

async fn create_invoice(router: &Router, invoice_id: i32) {
    let (status, body) = send(
        router,
        "POST",
        "/api/invoice",
        Some(json!({
            "invoiceId": invoice_id,
            "pmc": "P1",
            "siteName": "S1",
            "vendorName": "V1",
            "priorBalance": 100.0,
        })),
    )
    .await;
    assert_eq!(StatusCode::OK, status, "invoice creation failed: {body}");
}

async fn create_user(router: &Router, user_id: i32) {
    let (status, body) = send(
        router,
        "POST",
        "/api/user",
        Some(json!({ "userId": user_id, "name": "John Doe", "role": "Approver" })),
    )
    .await;
    assert_eq!(StatusCode::OK, status, "user creation failed: {body}");
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn invoice_lifecycle() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);

        let (status, body) = send(&router, "GET", "/api/invoice", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!("No invoices found"), body["message"]);
        assert_eq!(json!([]), body["data"]);

        create_invoice(&router, 1).await;

        let (status, body) = send(&router, "GET", "/api/invoice/1", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(
            exact_json(
                r#"{"invoiceId":1,"pmc":"P1","siteName":"S1","vendorName":"V1","priorBalance":100.00}"#
            ),
            body["data"]
        );

        let (status, body) = send(&router, "DELETE", "/api/invoice/1", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!("Invoice deleted successfully"), body["message"]);

        let (status, body) = send(&router, "GET", "/api/invoice/1", None).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!(json!(404), body["statusCode"]);

        let (status, _) = send(&router, "DELETE", "/api/invoice/1", None).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn largest_balance_round_trips_exactly() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);

        let (status, body) = send(
            &router,
            "POST",
            "/api/invoice",
            Some(exact_json(
                r#"{"invoiceId":7,"pmc":"P1","siteName":"S1","vendorName":"V1","priorBalance":9999999999999999.99}"#,
            )),
        )
        .await;
        assert_eq!(StatusCode::OK, status, "invoice creation failed: {body}");
        assert_eq!("9999999999999999.99", body["data"]["priorBalance"].to_string());

        let (status, body) = send(&router, "GET", "/api/invoice/7", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("9999999999999999.99", body["data"]["priorBalance"].to_string());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn balance_too_large_to_store_is_rejected() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);

        let (status, body) = send(
            &router,
            "POST",
            "/api/invoice",
            Some(exact_json(
                r#"{"invoiceId":7,"pmc":"P1","siteName":"S1","vendorName":"V1","priorBalance":10000000000000000}"#,
            )),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!(json!("Submitted data was invalid."), body["message"]);

        let (_, body) = send(&router, "GET", "/api/invoice", None).await;
        assert_eq!(json!([]), body["data"]);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn duplicate_invoice_id_is_rejected() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);
        create_invoice(&router, 1).await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/invoice",
            Some(json!({
                "invoiceId": 1,
                "pmc": "P2",
                "siteName": "S2",
                "vendorName": "V2",
                "priorBalance": 5,
            })),
        )
        .await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!(json!("Error creating invoice"), body["message"]);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn assignment_lifecycle() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);
        create_invoice(&router, 1).await;
        create_invoice(&router, 2).await;
        create_user(&router, 4).await;

        for _ in 0..2 {
            let (status, body) = send(
                &router,
                "POST",
                "/api/invoice/assign",
                Some(json!({ "invoiceId": 1, "userId": 4 })),
            )
            .await;
            assert_eq!(StatusCode::OK, status);
            assert_eq!(json!("Invoice assigned to user successfully"), body["message"]);
        }

        let (status, body) = send(&router, "GET", "/api/invoice/assignments", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(
            json!([
                { "invoiceId": 1, "userId": 4 },
                { "invoiceId": 2, "userId": null },
            ]),
            body["data"]
        );

        let (status, body) = send(
            &router,
            "POST",
            "/api/invoice/unassign",
            Some(json!({ "invoiceId": 1, "userId": 4 })),
        )
        .await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!("Invoice unassigned from user successfully"), body["message"]);

        let (status, body) = send(
            &router,
            "POST",
            "/api/invoice/unassign",
            Some(json!({ "invoiceId": 1, "userId": 4 })),
        )
        .await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!("Invoice is not assigned to the user"), body["message"]);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn assigning_to_missing_user_leaves_no_trace() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);
        create_invoice(&router, 1).await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/invoice/assign",
            Some(json!({ "invoiceId": 1, "userId": 99 })),
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!(json!("User not found"), body["message"]);

        let (_, body) = send(&router, "GET", "/api/invoice/assignments", None).await;
        assert_eq!(json!([{ "invoiceId": 1, "userId": null }]), body["data"]);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn deleting_invoice_removes_its_assignments() {
    prepare_db_and_test(|db| async move {
        let router = app_router(db);
        create_invoice(&router, 1).await;
        create_invoice(&router, 2).await;
        create_user(&router, 4).await;

        for invoice_id in [1, 2] {
            let (status, _) = send(
                &router,
                "POST",
                "/api/invoice/assign",
                Some(json!({ "invoiceId": invoice_id, "userId": 4 })),
            )
            .await;
            assert_eq!(StatusCode::OK, status);
        }

        let (status, _) = send(&router, "DELETE", "/api/invoice/1", None).await;
        assert_eq!(StatusCode::OK, status);

        let (_, body) = send(&router, "GET", "/api/invoice/assignments", None).await;
        assert_eq!(json!([{ "invoiceId": 2, "userId": 4 }]), body["data"]);
    });
}
