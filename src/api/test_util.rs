use axum::body::{Body, to_bytes};
use serde::de::DeserializeOwned;

/// Upper bound on the response bodies tests will read
const MAX_TEST_BODY_BYTES: usize = 1024 * 1024;

/// Reads a whole response body and parses it as JSON into the requested type, usually an
/// [Envelope][crate::routing_utils::Envelope]. Fails the test if either step fails.
pub async fn deserialize_body<T: DeserializeOwned>(response_body: Body) -> T {
    let bytes = to_bytes(response_body, MAX_TEST_BODY_BYTES)
        .await
        .expect("response body should be readable");

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "Response body did not match the expected structure ({err}). Received: {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}
