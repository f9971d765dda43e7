//! Batch pull of Epic API documentation records.
//!
//! Unlike the library layers, this command owns its own bounded
//! retry/backoff: documentation pulls are offline tooling, not a
//! user-facing login or query path.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::cli::PullDocsArgs;
use crate::output::print_success;

const MAX_ATTEMPTS: u32 = 4;
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(20);
const BACKOFF_STEP: Duration = Duration::from_millis(500);

pub async fn pull_docs(args: &PullDocsArgs) -> Result<()> {
    let ids = read_ids(&args.ids_file)?;
    if ids.is_empty() {
        anyhow::bail!("No ids found in {}", args.ids_file);
    }

    let http = reqwest::Client::builder()
        .timeout(ATTEMPT_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;

    let mut records = Vec::with_capacity(ids.len());
    for id in &ids {
        println!("Fetching {id}");
        let record = fetch_one(&http, &args.base, id, args.cookie.as_deref()).await?;
        records.push(with_id(id, record));
    }

    fs::write(&args.out, serde_json::to_string_pretty(&records)?)
        .with_context(|| format!("Failed to write {}", args.out))?;
    print_success(&format!("Wrote {} with {} records", args.out, records.len()));
    Ok(())
}

fn read_ids(path: &str) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read ids file: {path}"))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

async fn fetch_one(
    http: &reqwest::Client,
    base: &str,
    id: &str,
    cookie: Option<&str>,
) -> Result<Value> {
    let url = format!("{base}{id}");
    let mut last_err = None;

    for attempt in 1..=MAX_ATTEMPTS {
        let mut request = http
            .get(&url)
            .header("Accept", "application/json,text/plain,*/*")
            .header("User-Agent", "chartchat-pull/1.0 (+cli)");
        if let Some(cookie) = cookie {
            request = request.header("Cookie", cookie);
        }

        match send(request).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!("Attempt {attempt} for id {id} failed: {err:#}");
                last_err = Some(err);
                tokio::time::sleep(BACKOFF_STEP * attempt).await;
            }
        }
    }

    Err(match last_err {
        Some(err) => anyhow!("Failed for id {id}: {err:#}"),
        None => anyhow!("Failed for id {id}"),
    })
}

async fn send(request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP {status}");
    }
    response.json().await.context("Response was not JSON")
}

fn with_id(id: &str, record: Value) -> Value {
    match record {
        Value::Object(fields) => {
            let mut merged = serde_json::Map::with_capacity(fields.len() + 1);
            merged.insert("id".to_string(), Value::String(id.to_string()));
            merged.extend(fields);
            Value::Object(merged)
        }
        other => serde_json::json!({"id": id, "body": other}),
    }
}
