mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};
use shop_services::{
    app::build_app,
    config::ServiceKind,
    db::{DbPool, run_migrations},
    state::AppState,
};

use common::{delete, get, post_json, send};

// Runs every service against a real database. The flows share one test so
// the truncate below cannot race another test.
#[tokio::test]
async fn crud_flows_against_postgres() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run the CRUD flow tests."
            );
            return Ok(());
        }
    };

    let pool = DbPool::connect(&database_url).await?;
    run_migrations(&pool).await?;
    sqlx::query("TRUNCATE TABLE orders, products, users RESTART IDENTITY")
        .execute(&pool)
        .await?;

    let state = AppState::new(pool.clone(), Duration::from_secs(5));
    product_flow(&state).await;
    order_flow(&state).await;
    user_flow(&state).await;

    pool.close().await;
    Ok(())
}

async fn product_flow(state: &AppState) {
    let app = build_app(ServiceKind::Products, state.clone());

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ready");

    let (status, body) = send(&app, get("/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        post_json(
            "/product",
            r#"{"name":"Widget","description":"x","price":9.99}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = body["data"].clone();
    assert!(created["id"].as_i64().is_some());
    assert!(created["created_at"].is_string());
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["description"], "x");
    assert_eq!(created["price"], 9.99);

    let (status, body) = send(&app, get("/products")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().expect("product array");
    assert!(items.contains(&created), "listed products: {items:?}");
}

async fn order_flow(state: &AppState) {
    let app = build_app(ServiceKind::Orders, state.clone());

    let (status, body) = send(&app, get("/order/orders")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        post_json(
            "/order/order",
            r#"{"user_id":7,"product_id":3,"quantity":2,"status":"pending","total":19.98}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = body["data"].clone();
    let id = created["id"].as_i64().expect("order id");
    assert_eq!(created["user_id"], 7);
    assert_eq!(created["product_id"], 3);
    assert_eq!(created["quantity"], 2);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["total"], 19.98);
    assert!(created["order_date"].is_string());

    let (status, body) = send(&app, get(&format!("/order/order/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);

    let (status, body) = send(&app, get("/order/orders")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([created]));

    for missing in ["0", "-1", "424242", "9223372036854775807"] {
        let (status, body) = send(&app, get(&format!("/order/order/{missing}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "order {missing}");
        assert_eq!(body["data"]["error"], "Order not found");
    }
}

async fn user_flow(state: &AppState) {
    let app = build_app(ServiceKind::Users, state.clone());
    let register = r#"{"username":"alice","password":"s3cret","email":"alice@example.com"}"#;

    let (status, body) = send(&app, get("/user/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(&app, post_json("/user/register", register)).await;
    assert_eq!(status, StatusCode::CREATED);
    let profile = body["data"].clone();
    let id = profile["id"].as_i64().expect("user id");
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["email"], "alice@example.com");
    assert!(profile.get("password").is_none());

    let (status, body) = send(&app, post_json("/user/register", register)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "Username is already taken");

    let (status, body) = send(
        &app,
        post_json("/user/login", r#"{"username":"alice","password":"s3cret"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], profile);

    for attempt in [
        r#"{"username":"alice","password":"wrong"}"#,
        r#"{"username":"alice","password":"S3CRET"}"#,
        r#"{"username":"bob","password":"s3cret"}"#,
    ] {
        let (status, _) = send(&app, post_json("/user/login", attempt)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{attempt}");
    }

    let (status, body) = send(&app, get("/user/profile?username=alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], profile);

    let (status, _) = send(&app, get("/user/profile?username=bob")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/user/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Array(vec![profile.clone()]));

    let (status, body) = send(&app, delete("/user/users/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["error"], "User not found");

    let (status, body) = send(&app, delete(&format!("/user/users/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, _) = send(&app, delete(&format!("/user/users/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for missing in ["0", "-5", "9223372036854775807"] {
        let (status, _) = send(&app, delete(&format!("/user/users/{missing}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "user {missing}");
    }
}
