use super::test_util::prepare_db_and_test;
use crate::domain::invoice::driven_ports::DetectInvoice;
use crate::domain::user::driven_ports::DetectUser;
use crate::external_connections::{Transactable, TransactionHandle};
use crate::persistence;
use crate::persistence::db_invoice_driven_ports::DbDetectInvoice;
use crate::persistence::db_user_driven_ports::DbDetectUser;
use sqlx::{PgPool, query};

/// Deletes a row on a separate connection, giving up quickly if another transaction
/// holds a lock on it
async fn delete_without_waiting(
    db: &PgPool,
    statement: &str,
    id: i32,
) -> Result<u64, sqlx::Error> {
    let mut txn = db.begin().await?;
    query("SET LOCAL lock_timeout = '200ms'")
        .execute(&mut *txn)
        .await?;
    let deleted = query(statement).bind(id).execute(&mut *txn).await?.rows_affected();
    txn.commit().await?;

    Ok(deleted)
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn detected_invoice_survives_until_commit() {
    prepare_db_and_test(|db| async move {
        query(
            "INSERT INTO invoice(invoice_id, pmc, site_name, vendor_name, prior_balance) \
             VALUES (1, 'P1', 'S1', 'V1', 100)",
        )
        .execute(&db)
        .await
        .expect("invoice should insert");

        let ext_cxn = persistence::ExternalConnectivity::new(db.clone());
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .expect("transaction should start");
        let exists = DbDetectInvoice
            .invoice_exists(1, &mut txn)
            .await
            .expect("invoice detection should succeed");
        assert!(exists);

        let concurrent_delete =
            delete_without_waiting(&db, "DELETE FROM invoice WHERE invoice_id = $1", 1).await;
        assert!(
            concurrent_delete.is_err(),
            "invoice was deleted while another transaction relied on it"
        );

        txn.commit().await.expect("commit should succeed");
        let deleted = delete_without_waiting(&db, "DELETE FROM invoice WHERE invoice_id = $1", 1)
            .await
            .expect("invoice should be deletable after commit");
        assert_eq!(1, deleted);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn detected_user_survives_until_commit() {
    prepare_db_and_test(|db| async move {
        query("INSERT INTO app_user(user_id, user_name, role) VALUES (4, 'John Doe', 'Approver')")
            .execute(&db)
            .await
            .expect("user should insert");

        let ext_cxn = persistence::ExternalConnectivity::new(db.clone());
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .expect("transaction should start");
        let exists = DbDetectUser
            .user_exists(4, &mut txn)
            .await
            .expect("user detection should succeed");
        assert!(exists);

        let concurrent_delete =
            delete_without_waiting(&db, "DELETE FROM app_user WHERE user_id = $1", 4).await;
        assert!(
            concurrent_delete.is_err(),
            "user was deleted while another transaction relied on it"
        );

        txn.commit().await.expect("commit should succeed");
        let deleted = delete_without_waiting(&db, "DELETE FROM app_user WHERE user_id = $1", 4)
            .await
            .expect("user should be deletable after commit");
        assert_eq!(1, deleted);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn missing_rows_are_not_detected() {
    prepare_db_and_test(|db| async move {
        let ext_cxn = persistence::ExternalConnectivity::new(db);
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .expect("transaction should start");

        let invoice_exists = DbDetectInvoice
            .invoice_exists(1, &mut txn)
            .await
            .expect("invoice detection should succeed");
        let user_exists = DbDetectUser
            .user_exists(4, &mut txn)
            .await
            .expect("user detection should succeed");
        assert!(!invoice_exists);
        assert!(!user_exists);
    });
}
