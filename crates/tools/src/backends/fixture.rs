//! Deterministic stand-ins for the infrastructure tools.
//!
//! Each executor key maps to one handler that shapes a payload from the call's
//! arguments. Used when the relay runs without live tool servers, and in tests.

use crate::arguments::Arguments;
use crate::error::BackendError;
use crate::traits::ToolBackend;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

type Handler = fn(&StorageLocation, Arguments<'_>) -> Value;

const MAX_EXPIRY_HOURS: i64 = 24 * 7;

/// Where stored objects are said to live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub public_url: String,
    pub bucket: String,
}

impl StorageLocation {
    pub fn new(public_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, object_name: &str) -> String {
        format!("{}/{}", self.public_url, object_name)
    }
}

impl Default for StorageLocation {
    fn default() -> Self {
        Self::new("https://s3.example.com/mcp-storage", "mcp-storage")
    }
}

pub struct FixtureBackend {
    storage: StorageLocation,
    handlers: HashMap<&'static str, Handler>,
}

impl FixtureBackend {
    pub fn new(storage: StorageLocation) -> Self {
        let rows: [(&'static str, Handler); 21] = [
            ("postgres_list_schemas", list_databases),
            ("postgres_execute_sql", execute_sql),
            ("monitoring_get_container_logs", container_logs),
            ("monitoring_search_logs", search_logs),
            ("monitoring_get_metrics", system_metrics),
            ("docker_manage", manage_docker),
            ("fetch_get_url", fetch_url),
            ("n8n_list_workflows", list_workflows),
            ("n8n_execute_workflow", execute_workflow),
            ("n8n_get_executions", workflow_executions),
            ("timescaledb_query", query_timeseries),
            ("timescaledb_list_hypertables", list_hypertables),
            ("timescaledb_stats", timeseries_stats),
            ("playwright_navigate", browser_navigate),
            ("playwright_screenshot", browser_screenshot),
            ("playwright_extract", browser_extract),
            ("minio_list", storage_list),
            ("minio_upload", storage_upload),
            ("minio_download", storage_download),
            ("minio_delete", storage_delete),
            ("minio_presign", storage_presign),
        ];

        Self {
            storage,
            handlers: rows.into_iter().collect(),
        }
    }

    pub fn operations(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.handlers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for FixtureBackend {
    fn default() -> Self {
        Self::new(StorageLocation::default())
    }
}

#[async_trait]
impl ToolBackend for FixtureBackend {
    async fn call(&self, operation: &str, arguments: &Value) -> Result<Value, BackendError> {
        let handler = self
            .handlers
            .get(operation)
            .ok_or_else(|| BackendError::UnsupportedOperation(operation.to_string()))?;
        Ok(handler(&self.storage, Arguments::new(arguments)))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

fn list_databases(_: &StorageLocation, _: Arguments<'_>) -> Value {
    json!({"databases": ["postgres", "litellm_db", "keycloak", "n8n", "grafana"]})
}

fn execute_sql(_: &StorageLocation, args: Arguments<'_>) -> Value {
    json!({
        "database": args.str_or("database", "postgres"),
        "query": args.str_or("query", "SELECT 1"),
        "result": [
            {"column1": "value1", "column2": "value2"},
            {"column1": "value3", "column2": "value4"}
        ],
        "rows_affected": 2,
        "execution_time": "0.023s"
    })
}

fn container_logs(_: &StorageLocation, args: Arguments<'_>) -> Value {
    let container = args.str_or("container_name", "unknown");
    let count = args.i64_or("line_count", 50).clamp(0, 5) as usize;
    let lines: Vec<String> = [
        "Container started",
        "Health check passed",
        "Ready to serve",
        "Processing request",
        "Request completed",
    ]
    .iter()
    .enumerate()
    .take(count)
    .map(|(i, line)| format!("2025-09-07 20:30:0{} INFO [{}] {}", i, container, line))
    .collect();

    json!({"container": container, "logs": lines})
}

fn search_logs(_: &StorageLocation, args: Arguments<'_>) -> Value {
    let query = args.str_or("query", "");
    json!({
        "query": query,
        "time_range": args.str_or("time_range", "1h"),
        "matches": [
            {"timestamp": "2025-09-07T20:30:00Z", "container": "litellm", "message": format!("Found match for '{}'", query)},
            {"timestamp": "2025-09-07T20:31:00Z", "container": "open-webui", "message": format!("Log entry matching '{}'", query)},
            {"timestamp": "2025-09-07T20:32:00Z", "container": "mcp-relay", "message": format!("Debug: {} processed", query)}
        ],
        "total_matches": 3
    })
}

fn system_metrics(_: &StorageLocation, args: Arguments<'_>) -> Value {
    let metrics = json!({
        "cpu": {"usage": "23.5%", "cores": 8, "load_avg": [1.2, 1.5, 1.8]},
        "memory": {"used": "12.3GB", "total": "32GB", "percentage": "38.4%"},
        "disk": {"used": "456GB", "total": "1TB", "percentage": "45.6%"},
        "network": {"rx": "1.2GB/s", "tx": "0.8GB/s", "connections": 234}
    });

    match args.str_or("metric_type", "all") {
        "all" => metrics,
        kind => {
            let value = metrics
                .get(kind)
                .cloned()
                .unwrap_or_else(|| json!("Invalid metric type"));
            let mut single = Map::new();
            single.insert(kind.to_string(), value);
            Value::Object(single)
        }
    }
}

fn manage_docker(_: &StorageLocation, args: Arguments<'_>) -> Value {
    let action = args.str_or("action", "ps");
    if action == "ps" {
        return json!({
            "containers": [
                {"name": "litellm", "status": "running", "uptime": "2 days"},
                {"name": "open-webui", "status": "running", "uptime": "2 days"},
                {"name": "mcp-relay", "status": "running", "uptime": "10 minutes"},
                {"name": "postgres", "status": "running", "uptime": "30 days"}
            ]
        });
    }

    let container = args.str_or("container", "");
    let target = if container.is_empty() { "all containers" } else { container };
    json!({
        "action": action,
        "container": container,
        "result": format!("Successfully executed {} on {}", action, target)
    })
}

fn fetch_url(_: &StorageLocation, args: Arguments<'_>) -> Value {
    let url = args.str_or("url", "https://example.com");
    json!({
        "url": url,
        "status_code": 200,
        "content_preview": format!("Mock content from {}...", url),
        "headers": {"content-type": "text/html", "content-length": "1234"},
        "fetched_at": Utc::now().to_rfc3339()
    })
}

fn list_workflows(_: &StorageLocation, _: Arguments<'_>) -> Value {
    json!({
        "workflows": [
            {"id": "1", "name": "Daily Backup", "active": true, "last_run": "2025-09-07T00:00:00Z"},
            {"id": "2", "name": "Alert Monitor", "active": true, "last_run": "2025-09-07T22:00:00Z"},
            {"id": "3", "name": "Data Sync", "active": false, "last_run": "2025-09-06T12:00:00Z"},
            {"id": "4", "name": "Report Generator", "active": true, "last_run": "2025-09-07T08:00:00Z"}
        ],
        "total": 4,
        "active": 3
    })
}

fn execute_workflow(_: &StorageLocation, args: Arguments<'_>) -> Value {
    let workflow_id = args.str_or("workflow_id", "1");
    json!({
        "workflow_id": workflow_id,
        "execution_id": "exec-12345",
        "status": "started",
        "input": args.value_or_null("data"),
        "started_at": Utc::now().to_rfc3339(),
        "message": format!("Workflow {} execution started successfully", workflow_id)
    })
}

fn workflow_executions(_: &StorageLocation, args: Arguments<'_>) -> Value {
    json!({
        "workflow_id": args.value_or_null("workflow_id"),
        "executions": [
            {"id": "exec-123", "workflow": "Daily Backup", "status": "success", "duration": "45s", "finished_at": "2025-09-07T00:00:45Z"},
            {"id": "exec-124", "workflow": "Alert Monitor", "status": "success", "duration": "2s", "finished_at": "2025-09-07T22:00:02Z"},
            {"id": "exec-125", "workflow": "Report Generator", "status": "failed", "error": "Connection timeout", "finished_at": "2025-09-07T08:05:00Z"}
        ],
        "total": 3,
        "limit": args.i64_or("limit", 10)
    })
}

fn query_timeseries(_: &StorageLocation, args: Arguments<'_>) -> Value {
    json!({
        "query": args.str_or("query", "SELECT * FROM metrics LIMIT 10"),
        "time_range": args.str_or("time_range", "24h"),
        "results": [
            {"timestamp": "2025-09-07T22:00:00Z", "metric": "cpu_usage", "value": 45.2, "host": "server1"},
            {"timestamp": "2025-09-07T22:15:00Z", "metric": "cpu_usage", "value": 52.1, "host": "server1"},
            {"timestamp": "2025-09-07T22:30:00Z", "metric": "cpu_usage", "value": 38.9, "host": "server1"}
        ],
        "row_count": 3
    })
}

fn list_hypertables(_: &StorageLocation, _: Arguments<'_>) -> Value {
    json!({
        "hypertables": [
            {"name": "metrics", "dimensions": 1, "chunks": 156, "compression": true, "retention": "30 days"},
            {"name": "logs", "dimensions": 1, "chunks": 89, "compression": true, "retention": "7 days"},
            {"name": "events", "dimensions": 2, "chunks": 234, "compression": false, "retention": "90 days"}
        ],
        "total": 3,
        "database": "timescaledb"
    })
}

fn timeseries_stats(_: &StorageLocation, args: Arguments<'_>) -> Value {
    json!({
        "table": args.str_or("table_name", "all"),
        "stats": {
            "total_rows": 1234567,
            "disk_size": "2.3 GB",
            "compressed_size": "456 MB",
            "compression_ratio": "5.0x",
            "chunk_count": 156,
            "oldest_data": "2025-08-07T00:00:00Z",
            "newest_data": "2025-09-07T22:30:00Z"
        }
    })
}

fn browser_navigate(_: &StorageLocation, args: Arguments<'_>) -> Value {
    json!({
        "url": args.str_or("url", "https://example.com"),
        "status": "navigated",
        "page_title": "Example Domain",
        "waited_for": args.value_or_null("wait_for"),
        "load_time": "1.2s"
    })
}

/// Object key for a screenshot of `url` taken at `timestamp`.
fn screenshot_key(url: &str, timestamp: i64) -> String {
    let stem: String = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .replace('/', "_")
        .chars()
        .take(50)
        .collect();
    format!("screenshots/{}_{}.png", stem, timestamp)
}

fn browser_screenshot(storage: &StorageLocation, args: Arguments<'_>) -> Value {
    let url = args.str_or("url", "https://example.com");
    let full_page = args.bool_or("full_page", true);
    let key = screenshot_key(url, Utc::now().timestamp());

    json!({
        "url": url,
        "screenshot_saved": true,
        "storage_path": key,
        "storage_url": storage.object_url(&key),
        "full_page": full_page,
        "selector": args.value_or_null("selector"),
        "dimensions": if full_page { "1920x3500" } else { "1920x1080" },
        "file_size": "234KB",
        "message": format!("Screenshot of {} saved to storage at {}", url, key),
        "format": "png"
    })
}

fn browser_extract(_: &StorageLocation, args: Arguments<'_>) -> Value {
    json!({
        "url": args.str_or("url", "https://example.com"),
        "selector": args.str_or("selector", "h1"),
        "attribute": args.str_or("attribute", "text"),
        "extracted": [
            {"element": 1, "value": "Example Domain"},
            {"element": 2, "value": "This is an example page"}
        ],
        "count": 2
    })
}

fn storage_list(storage: &StorageLocation, args: Arguments<'_>) -> Value {
    let prefix = args.str_or("prefix", "");
    let objects: Vec<Value> = [
        ("screenshots/google.com_1735789200.png", "234KB", "2025-09-07T22:00:00Z"),
        ("screenshots/github.com_1735789100.png", "456KB", "2025-09-07T21:45:00Z"),
        ("uploads/document.pdf", "1.2MB", "2025-09-07T20:00:00Z"),
        ("temp/analysis.json", "12KB", "2025-09-07T19:30:00Z"),
    ]
    .iter()
    .filter(|(name, _, _)| name.starts_with(prefix))
    .map(|(name, size, modified)| json!({"name": name, "size": size, "modified": modified}))
    .collect();

    json!({
        "bucket": storage.bucket,
        "prefix": prefix,
        "recursive": args.bool_or("recursive", false),
        "total": objects.len(),
        "objects": objects
    })
}

fn storage_upload(storage: &StorageLocation, args: Arguments<'_>) -> Value {
    let object_name = args.str_or("object_name", "uploads/file.txt");
    json!({
        "status": "uploaded",
        "bucket": storage.bucket,
        "object_name": object_name,
        "size": args.str_or("data", "").len(),
        "content_type": args.str_or("content_type", "application/octet-stream"),
        "url": storage.object_url(object_name),
        "message": format!("Successfully uploaded {}", object_name)
    })
}

fn storage_download(storage: &StorageLocation, args: Arguments<'_>) -> Value {
    let object_name = args.str_or("object_name", "");
    let content_type = if object_name.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    };
    json!({
        "status": "downloaded",
        "bucket": storage.bucket,
        "object_name": object_name,
        "data": "base64_encoded_file_content_here",
        "size": "234KB",
        "content_type": content_type,
        "message": format!("Successfully downloaded {}", object_name)
    })
}

fn storage_delete(storage: &StorageLocation, args: Arguments<'_>) -> Value {
    let object_name = args.str_or("object_name", "");
    json!({
        "status": "deleted",
        "bucket": storage.bucket,
        "object_name": object_name,
        "message": format!("Successfully deleted {}", object_name)
    })
}

fn storage_presign(storage: &StorageLocation, args: Arguments<'_>) -> Value {
    let object_name = args.str_or("object_name", "");
    let hours = args.i64_or("expiry_hours", 24).clamp(1, MAX_EXPIRY_HOURS);
    let expires_at = Utc::now() + Duration::hours(hours);

    json!({
        "status": "success",
        "bucket": storage.bucket,
        "object_name": object_name,
        "presigned_url": format!(
            "{}?X-Amz-Expires={}&X-Amz-Signature=fixture",
            storage.object_url(object_name),
            hours * 3600
        ),
        "expires_at": expires_at.to_rfc3339(),
        "expiry_hours": hours,
        "message": format!("Generated presigned URL for {}, valid for {} hours", object_name, hours)
    })
}
