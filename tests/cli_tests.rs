use std::process::Output;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::process::Command;

mod test_helpers {
    use super::*;

    pub async fn spawn_upstream(status: StatusCode, body: Value) -> Result<(String, Arc<AtomicUsize>)> {
        let hits = Arc::new(AtomicUsize::new(0));
        let handler = move |State(hits): State<Arc<AtomicUsize>>| {
            let body = body.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (status, Json(body))
            }
        };
        let router = Router::new()
            .route("/res/v1/web/search", get(handler.clone()))
            .route("/v1/search", post(handler.clone()))
            .route("/v1/fetch", post(handler))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok((format!("http://{addr}"), hits))
    }

    pub async fn brave_search(base_url: &str, key: &str, args: &[&str]) -> Result<Output> {
        Ok(Command::new(env!("CARGO_BIN_EXE_brave-search"))
            .args(args)
            .env("BRAVE_API_KEY", key)
            .env("BRAVE_API_BASE_URL", base_url)
            .output()
            .await?)
    }

    pub async fn linkup_search(base_url: &str, key: &str, args: &[&str]) -> Result<Output> {
        Ok(Command::new(env!("CARGO_BIN_EXE_linkup-search"))
            .args(args)
            .env("LINKUP_API_KEY", key)
            .env("LINKUP_API_BASE_URL", base_url)
            .output()
            .await?)
    }

    pub fn stdout(output: &Output) -> String {
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    pub fn stderr(output: &Output) -> String {
        String::from_utf8_lossy(&output.stderr).into_owned()
    }
}

use test_helpers::*;

fn three_brave_results() -> Value {
    json!({
        "web": {
            "results": [
                { "title": "One", "url": "https://one.example", "description": "first" },
                { "title": "Two", "url": "https://two.example", "description": "second" },
                { "title": "Three", "url": "https://three.example" },
            ]
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_brave_search_text_output() -> Result<()> {
    let (base, hits) = spawn_upstream(StatusCode::OK, three_brave_results()).await?;
    let output = brave_search(&base, "key", &["python", "tutorials", "-n", "5"]).await?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Brave Search Results for: python tutorials"));
    assert!(out.contains("1. One"));
    assert!(out.contains("3. Three"));
    assert!(out.contains("Total results displayed: 3"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_brave_search_json_output() -> Result<()> {
    let (base, _) = spawn_upstream(StatusCode::OK, three_brave_results()).await?;
    let output = brave_search(&base, "key", &["rust", "-n", "2", "--json"]).await?;

    assert_eq!(output.status.code(), Some(0));
    let json: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(json["query"], "rust");
    assert_eq!(json["num_results_requested"], 2);
    assert_eq!(json["num_results_found"], 3);
    assert_eq!(json["results"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_key_exits_1_without_calling_upstream() -> Result<()> {
    let (base, hits) = spawn_upstream(StatusCode::OK, three_brave_results()).await?;
    let output = brave_search(&base, "", &["rust"]).await?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("BRAVE_API_KEY"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_2xx_exits_1_with_status_code() -> Result<()> {
    let body = json!({ "errors": [ { "detail": "subscription expired" } ] });
    let (base, _) = spawn_upstream(StatusCode::FORBIDDEN, body).await?;

    let output = brave_search(&base, "key", &["rust"]).await?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("403"));

    let output = brave_search(&base, "key", &["rust", "--json"]).await?;
    assert_eq!(output.status.code(), Some(1));
    let json: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(json["error"], true);
    assert_eq!(json["status_code"], 403);
    assert_eq!(json["message"], "subscription expired");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_out_of_range_count_exits_1() -> Result<()> {
    let (base, hits) = spawn_upstream(StatusCode::OK, three_brave_results()).await?;
    for n in ["0", "101"] {
        let output = brave_search(&base, "key", &["rust", "-n", n]).await?;
        assert_eq!(output.status.code(), Some(1));
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_date_fails_before_network() -> Result<()> {
    let (base, hits) = spawn_upstream(StatusCode::OK, json!({ "results": [] })).await?;
    let output = linkup_search(
        &base,
        "key",
        &["search", "test", "--from-date", "01-01-2024"],
    )
    .await?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("YYYY-MM-DD"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_linkup_search_json_and_fetch_errors() -> Result<()> {
    let body = json!({ "results": [ { "name": "A", "url": "https://a.example", "content": "x" } ] });
    let (base, _) = spawn_upstream(StatusCode::OK, body).await?;
    let output = linkup_search(&base, "key", &["search", "a", "b", "--json"]).await?;
    assert_eq!(output.status.code(), Some(0));
    let json: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(json["mode"], "search");
    assert_eq!(json["query"], "a b");
    assert_eq!(json["results"][0]["url"], "https://a.example");

    let (base, _) = spawn_upstream(
        StatusCode::BAD_REQUEST,
        json!({ "error": { "message": "cannot fetch" } }),
    )
    .await?;
    let output = linkup_search(&base, "key", &["fetch", "https://example.com", "--json"]).await?;
    assert_eq!(output.status.code(), Some(1));
    let json: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(json["mode"], "fetch");
    assert_eq!(json["status_code"], 400);
    assert_eq!(json["error_message"], "cannot fetch");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_linkup_requires_a_mode() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_linkup-search"))
        .output()
        .await?;
    assert_eq!(output.status.code(), Some(1));

    let output = Command::new(env!("CARGO_BIN_EXE_linkup-search"))
        .arg("--help")
        .output()
        .await?;
    assert_eq!(output.status.code(), Some(0));
    Ok(())
}
