use ladle_server::{build_app, AppConfig};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

async fn start_server() -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    start_server_with(AppConfig::default()).await
}

async fn start_server_with(
    cfg: AppConfig,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&cfg).await.expect("build app");

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

#[tokio::test]
async fn health_endpoints_work() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    // GET /
    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["service"], "Ladle Server");
    assert_eq!(body["status"], "ok");

    // GET /healthz
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // GET /readyz
    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["cache_mode"], "local");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn create_then_list_then_delete() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    // POST a new recipe; the store assigns the identifier.
    let resp = client
        .post(format!("{base}/recipes"))
        .json(&json!({ "title": "New York Pizza" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().expect("generated id").to_string();
    assert!(!id.is_empty());
    assert_eq!(created["title"], "New York Pizza");

    // The very next listing must include it (cache invalidated on create).
    let resp = client.get(format!("{base}/recipes")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let listed: Vec<Value> = resp.json().await.unwrap();
    assert!(listed.iter().any(|r| r["id"] == id.as_str()));

    // Clean up and verify the listing empties out again.
    let resp = client
        .delete(format!("{base}/recipes/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Recipe has been deleted");

    let resp = client.get(format!("{base}/recipes")).send().await.unwrap();
    let listed: Vec<Value> = resp.json().await.unwrap();
    assert!(listed.is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let unknown = uuid::Uuid::new_v4();
    let resp = client
        .delete(format!("{base}/recipes/{unknown}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Recipe not found");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn get_by_id_answers_404_for_absent_and_malformed() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/recipes"))
        .json(&json!({ "title": "Ramen", "url": "https://example.com/ramen" }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = client
        .get(format!("{base}/recipes/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["title"], "Ramen");

    // Unknown id
    let unknown = uuid::Uuid::new_v4();
    let resp = client
        .get(format!("{base}/recipes/{unknown}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Recipe not found");

    // Malformed id reads the same as an unknown one
    let resp = client
        .get(format!("{base}/recipes/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn update_is_visible_in_next_listing() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/recipes"))
        .json(&json!({ "title": "Plain Toast" }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    // Warm the cache.
    let resp = client.get(format!("{base}/recipes")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .put(format!("{base}/recipes/{id}"))
        .json(&json!({ "title": "French Toast", "tags": ["breakfast"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Recipe has been updated");

    // The listing immediately after the PUT reflects the new fields.
    let resp = client.get(format!("{base}/recipes")).send().await.unwrap();
    let listed: Vec<Value> = resp.json().await.unwrap();
    let updated = listed.iter().find(|r| r["id"] == id).expect("still listed");
    assert_eq!(updated["title"], "French Toast");

    // Updating an unknown id is a 404.
    let unknown = uuid::Uuid::new_v4();
    let resp = client
        .put(format!("{base}/recipes/{unknown}"))
        .json(&json!({ "title": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn search_by_tag() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    // No matching records: 404 with a message field.
    let resp = client
        .get(format!("{base}/recipes/search?tag=dessert"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Recipes not found");

    let resp = client
        .post(format!("{base}/recipes"))
        .json(&json!({ "title": "Tiramisu", "tags": ["dessert", "italian"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{base}/recipes/search?tag=dessert"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let found: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Tiramisu");

    // Tag match is case-sensitive.
    let resp = client
        .get(format!("{base}/recipes/search?tag=Dessert"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn malformed_body_is_400() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/recipes"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
