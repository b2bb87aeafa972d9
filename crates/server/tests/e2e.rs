use migration::MigratorTrait;
use reqwest::StatusCode;
use serde_json::json;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::ServerState;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let _ = dotenvy::dotenv();
    // Prefer env over any local config file
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");

    if std::env::var("DATABASE_URL").is_err() {
        anyhow::bail!("missing DATABASE_URL");
    }

    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    let state = ServerState::new(db);
    let app = routes::build_router(state, CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestApp { base_url: format!("http://{}", addr) })
}

#[tokio::test]
async fn order_set_lifecycle_over_http() -> anyhow::Result<()> {
    let app = match start_server().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skip e2e: {}", e);
            return Ok(());
        }
    };
    // Redirects left unfollowed so the delete 303 is observable
    let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build()?;

    let health = client.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(health.status(), StatusCode::OK);

    // Create
    let marker = uuid::Uuid::new_v4().simple().to_string();
    let name = format!("Consolidation {}", marker);
    let created: serde_json::Value = client
        .post(format!("{}/order-sets", app.base_url))
        .json(&json!({ "name": name, "cyclical": true, "cycle_length_days": 21 }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let id = created["id"].as_i64().expect("id");
    let uuid = created["uuid"].as_str().expect("uuid").to_string();

    // View by id and by uuid
    let viewed = client.get(format!("{}/order-sets/{}", app.base_url, id)).send().await?;
    assert_eq!(viewed.status(), StatusCode::OK);
    let by_uuid = client.get(format!("{}/order-sets/by-uuid/{}", app.base_url, uuid)).send().await?;
    assert_eq!(by_uuid.status(), StatusCode::OK);

    // Listed under its partial name
    let listed: serde_json::Value = client
        .get(format!("{}/order-sets?q={}", app.base_url, marker))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed.as_array().map(|a| a.len()), Some(1));

    // Retire drops it from the default listing, include_retired brings it back
    let retired = client
        .post(format!("{}/order-sets/{}/retire", app.base_url, id))
        .json(&json!({ "reason": "e2e" }))
        .send()
        .await?;
    assert_eq!(retired.status(), StatusCode::OK);
    let defaults: serde_json::Value = client
        .get(format!("{}/order-sets?q={}", app.base_url, marker))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(defaults.as_array().map(|a| a.len()), Some(0));
    let all: serde_json::Value = client
        .get(format!("{}/order-sets?q={}&include_retired=true", app.base_url, marker))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all.as_array().map(|a| a.len()), Some(1));

    // Delete redirects back to the listing
    let deleted = client.delete(format!("{}/order-sets/{}", app.base_url, id)).send().await?;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(deleted.headers().get("location").and_then(|v| v.to_str().ok()), Some("/order-sets"));

    // Gone afterwards; deleting again is a 404
    let gone = client.get(format!("{}/order-sets/{}", app.base_url, id)).send().await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    let again = client.delete(format!("{}/order-sets/{}", app.base_url, id)).send().await?;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn blank_name_is_rejected() -> anyhow::Result<()> {
    let app = match start_server().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skip e2e: {}", e);
            return Ok(());
        }
    };
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/order-sets", app.base_url))
        .json(&json!({ "name": "   " }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_group_kind_is_rejected() -> anyhow::Result<()> {
    let app = match start_server().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skip e2e: {}", e);
            return Ok(());
        }
    };
    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{}/patients/1/order-groups?kind=regimen", app.base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let ok = client
        .get(format!("{}/patients/1/order-groups?kind=drug_regimen", app.base_url))
        .send()
        .await?;
    assert_eq!(ok.status(), StatusCode::OK);
    Ok(())
}
