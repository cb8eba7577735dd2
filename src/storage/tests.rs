//! Storage Module Tests
//!
//! Validates the worker-side object store and its batch endpoint.
//!
//! ## Test Scopes
//! - **WorkerStore**: Read/write semantics, the not-found sentinel and order preservation.
//! - **HTTP endpoint**: The axum app served on a real socket, exercised with `reqwest`.

#[cfg(test)]
mod tests {
    use crate::storage::handlers::worker_app;
    use crate::storage::memory::WorkerStore;
    use crate::storage::protocol::{ENDPOINT_MESSAGES, NOT_FOUND, StoreRequest, StoreResponse};
    use std::sync::Arc;

    async fn spawn_worker(store: Arc<WorkerStore>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, worker_app(store)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    // ============================================================
    // WORKER STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_write_then_read_in_same_batch() {
        let store = WorkerStore::new("7");

        let response = store
            .handle_batch(vec![
                StoreRequest::write("r1", "obj1", 10, "hashA"),
                StoreRequest::read("r2", "obj1"),
            ])
            .await;

        assert_eq!(response.result, vec!["r1,7", "r2,hashA"]);
    }

    #[tokio::test]
    async fn test_unknown_read_yields_sentinel() {
        let store = WorkerStore::new("0");

        let response = store
            .handle_batch(vec![StoreRequest::read("r1", "never-written")])
            .await;

        assert_eq!(response.result.len(), 1);
        assert_eq!(response.result[0], format!("r1,{}", NOT_FOUND));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = WorkerStore::new("0");

        store
            .handle_batch(vec![
                StoreRequest::write("r1", "obj", 5, "old"),
                StoreRequest::write("r2", "obj", 5, "new"),
            ])
            .await;

        assert_eq!(store.get("obj").await.as_deref(), Some("new"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_results_follow_request_order() {
        let store = WorkerStore::new("w");
        store.put("known".to_string(), "h".to_string()).await;

        let requests: Vec<StoreRequest> = (0..200)
            .map(|i| match i % 3 {
                0 => StoreRequest::write(format!("req-{}", i), format!("obj-{}", i), 1, "x"),
                1 => StoreRequest::read(format!("req-{}", i), "known"),
                _ => StoreRequest::read(format!("req-{}", i), "missing"),
            })
            .collect();

        let response = store.handle_batch(requests.clone()).await;

        assert_eq!(response.result.len(), requests.len());
        for (request, line) in requests.iter().zip(&response.result) {
            let (id, _) = line.split_once(',').unwrap();
            assert_eq!(id, request.request_id);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_batches_do_not_lose_writes() {
        let store = Arc::new(WorkerStore::new("0"));

        let mut handles = Vec::new();
        for batch in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let requests = (0..50)
                    .map(|i| {
                        StoreRequest::write(
                            format!("r-{}-{}", batch, i),
                            format!("obj-{}-{}", batch, i),
                            1,
                            format!("h-{}-{}", batch, i),
                        )
                    })
                    .collect();
                store.handle_batch(requests).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().result.len(), 50);
        }

        assert_eq!(store.len().await, 16 * 50);
        assert_eq!(store.get("obj-3-17").await.as_deref(), Some("h-3-17"));
    }

    // ============================================================
    // HTTP ENDPOINT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_messages_endpoint_round_trip() {
        let store = Arc::new(WorkerStore::new("3"));
        let base = spawn_worker(store.clone()).await;

        let response: StoreResponse = reqwest::Client::new()
            .post(format!("{}{}", base, ENDPOINT_MESSAGES))
            .json(&vec![
                StoreRequest::write("r1", "obj1", 100, "h1"),
                StoreRequest::read("r2", "obj1"),
                StoreRequest::read("r3", "obj2"),
            ])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(response.result, vec!["r1,3", "r2,h1", "r3,"]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_wire_format_accepts_read_without_size_or_hash() {
        let base = spawn_worker(Arc::new(WorkerStore::new("0"))).await;

        let body = serde_json::json!([
            {"request_id": "r1", "object_id": "o", "hash": "hh", "size": 4, "action": "W"},
            {"request_id": "r2", "object_id": "o", "action": "R"}
        ]);
        let response: StoreResponse = reqwest::Client::new()
            .post(format!("{}{}", base, ENDPOINT_MESSAGES))
            .json(&body)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(response.result, vec!["r1,0", "r2,hh"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let base = spawn_worker(Arc::new(WorkerStore::new("0"))).await;

        let response = reqwest::Client::new()
            .post(format!("{}{}", base, ENDPOINT_MESSAGES))
            .header("content-type", "application/json")
            .body("{\"not\": \"an array\"}")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
