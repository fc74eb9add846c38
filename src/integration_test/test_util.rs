use crate::{SharedData, app_env, build_router, db, persistence};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::sync::Arc;
use std::{env, future::Future, panic};
use tokio::runtime::Runtime;
use tower::ServiceExt;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A throwaway database created for a single test
struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("test_db_{db_id}");

        let mut conn = PgConnection::connect(base_url).await?;
        sqlx::query(&format!("CREATE DATABASE {db_name}"))
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(Self {
            base_url: base_url.to_owned(),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    async fn destroy(self) {
        let conn = PgConnection::connect(&self.base_url).await;
        let mut conn = match conn {
            Ok(cxn) => cxn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to drop test database {}, please remove it manually. Error: {conn_err}",
                    self.db_name
                );
                return;
            }
        };

        let drop_result = sqlx::query(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.db_name))
            .execute(&mut conn)
            .await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {db_err}",
                self.db_name
            );
        }
        let _ = conn.close().await;
    }
}

/// Creates an empty, fully migrated database for a test and removes it afterwards, even if
/// the test panics.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    F: FnOnce(PgPool) -> R,
    R: Future<Output = ()> + Send + 'static,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let base_url = env::var(app_env::test::TEST_DB_URL).expect(
            "You must provide the TEST_DB_URL environment variable as the base postgres connection string",
        );
        let test_db = match TestDatabase::create(&base_url).await {
            Ok(tdb) => tdb,
            Err(db_err) => panic!("Failed to create test database: {db_err}"),
        };

        let pool = db::connect_sqlx(&test_db.url())
            .await
            .expect("Could not connect to the test database");
        db::run_migrations(&pool)
            .await
            .expect("Could not migrate the test database");

        let test_outcome = tokio::spawn(test_fn(pool.clone())).await;

        pool.close().await;
        test_db.destroy().await;

        if let Err(join_err) = test_outcome {
            if join_err.is_panic() {
                panic::resume_unwind(join_err.into_panic());
            }
            panic!("Test task did not finish: {join_err}");
        }
    });
}

/// Builds the full application router on top of a test database
pub fn app_router(db: PgPool) -> Router {
    build_router(Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    }))
}

/// Sends a request through the router and returns the status along with the decoded envelope
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json_body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request should build");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let envelope = crate::api::test_util::deserialize_body(response.into_body()).await;

    (status, envelope)
}
