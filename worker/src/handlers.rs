use axum::{body::Bytes, extract::Extension, http::StatusCode, Json};
use rangecrack_core::{CrackRequest, CrackResponse, ErrorResponse, Worker};
use serde::{Deserialize, Serialize};

/// Body of every answer of the `/crack` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkerReply {
    Crack(CrackResponse),
    Error(ErrorResponse),
}

pub async fn handle_crack(
    Extension(worker): Extension<Worker>,
    body: Bytes,
) -> (StatusCode, Json<WorkerReply>) {
    let request: CrackRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Failed to parse crack request: {}", e);
            return invalid_input();
        }
    };

    let job = match request.validate(worker.hash_function()) {
        Ok(job) => job,
        Err(e) => {
            tracing::warn!("Rejected crack request: {}", e);
            return invalid_input();
        }
    };

    // the search is CPU bound and runs to completion, even if the client went away
    let result = tokio::task::spawn_blocking(move || worker.crack(&job)).await;

    match result {
        Ok(Ok(response)) => (StatusCode::OK, Json(WorkerReply::Crack(response))),
        Ok(Err(e)) => {
            tracing::error!("Crack request failed: {}", e);
            internal_error()
        }
        Err(e) => {
            tracing::error!("Crack task panicked: {}", e);
            internal_error()
        }
    }
}

pub async fn handle_health() -> &'static str {
    "ok"
}

fn invalid_input() -> (StatusCode, Json<WorkerReply>) {
    (
        StatusCode::BAD_REQUEST,
        Json(WorkerReply::Error(ErrorResponse::invalid_input())),
    )
}

fn internal_error() -> (StatusCode, Json<WorkerReply>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(WorkerReply::Error(ErrorResponse::internal())),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Bytes, extract::Extension, http::StatusCode};
    use rangecrack_core::{
        CacheKey, CrackResponse, ErrorResponse, HashFunction, ResultCache, Worker,
    };
    use serde_json::json;

    use super::{handle_crack, handle_health, WorkerReply};

    const ABCD: &str = "e2fc714c4727ee9395f324cd2e7f331f";

    struct BrokenCache;

    impl ResultCache for BrokenCache {
        fn get(&self, _key: &CacheKey) -> Option<CrackResponse> {
            panic!("cache unavailable")
        }

        fn set(&self, _key: CacheKey, _value: CrackResponse) {}
    }

    async fn post(worker: &Worker, body: serde_json::Value) -> (StatusCode, WorkerReply) {
        let (status, reply) = handle_crack(
            Extension(worker.clone()),
            Bytes::from(body.to_string()),
        )
        .await;

        (status, reply.0)
    }

    #[tokio::test]
    async fn test_full_search() {
        let worker = Worker::with_memory_cache(HashFunction::Md5);

        let (status, reply) = post(&worker, json!({ "hashed_password": ABCD, "max_length": 4 })).await;

        assert_eq!(StatusCode::OK, status);
        assert_eq!(
            WorkerReply::Crack(CrackResponse::Success {
                cleartext_password: "abcd".to_owned(),
                hashed_password: ABCD.to_owned(),
            }),
            reply
        );
    }

    #[tokio::test]
    async fn test_range_search_not_found() {
        let worker = Worker::with_memory_cache(HashFunction::Md5);

        let (status, reply) = post(
            &worker,
            json!({ "hashed_password": ABCD, "max_length": 4, "start_index": 0, "end_index": 701 }),
        )
        .await;

        assert_eq!(StatusCode::OK, status);
        assert_eq!(
            WorkerReply::Crack(CrackResponse::Failed {
                message: "Password not found in range 0-701 up to length 4".to_owned(),
                hashed_password: ABCD.to_owned(),
            }),
            reply
        );
    }

    #[tokio::test]
    async fn test_identical_requests() {
        let worker = Worker::with_memory_cache(HashFunction::Md5);
        let body = json!({
            "hashed_password": ABCD,
            "max_length": 4,
            "start_index": 18_000,
            "end_index": 20_000,
        });

        let first = post(&worker, body.clone()).await;
        let second = post(&worker, body).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_requests() {
        let worker = Worker::with_memory_cache(HashFunction::Md5);
        let expected = (
            StatusCode::BAD_REQUEST,
            WorkerReply::Error(ErrorResponse::invalid_input()),
        );

        assert_eq!(expected, post(&worker, json!({ "max_length": 4 })).await);
        assert_eq!(
            expected,
            post(&worker, json!({ "hashed_password": ABCD, "max_length": "4" })).await
        );
        assert_eq!(
            expected,
            post(&worker, json!({ "hashed_password": ABCD })).await
        );
        assert_eq!(
            expected,
            post(&worker, json!({ "hashed_password": "abcd", "max_length": 4 })).await
        );

        let (status, reply) =
            handle_crack(Extension(worker), Bytes::from_static(b"not json")).await;
        assert_eq!(expected, (status, reply.0));
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let worker = Worker::new(HashFunction::Md5, Arc::new(BrokenCache));

        let (status, reply) = post(&worker, json!({ "hashed_password": ABCD, "max_length": 1 })).await;

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!(WorkerReply::Error(ErrorResponse::internal()), reply);
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!("ok", handle_health().await);
    }
}
