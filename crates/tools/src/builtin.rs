//! The builtin tool table.
//!
//! Adding a tool is a row here plus, for the fixture executor, a handler row in
//! [`crate::backends::fixture`].

use crate::catalog::{Category, ToolSpec};
use serde_json::{json, Value};

fn spec(
    name: &str,
    category: Category,
    executor_key: &str,
    requires_privilege: bool,
    description: &str,
    parameters: Value,
) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: description.to_string(),
        parameters,
        requires_privilege,
        executor_key: executor_key.to_string(),
        category,
    }
}

fn no_parameters() -> Value {
    json!({"type": "object", "properties": {}})
}

pub fn specs() -> Vec<ToolSpec> {
    use Category::*;

    vec![
        spec(
            "list_mcp_tools",
            Meta,
            "internal_list_tools",
            false,
            "List all available MCP (Model Context Protocol) tools and their capabilities. Use this when asked about available tools, functions, or MCP capabilities.",
            no_parameters(),
        ),
        spec(
            "list_databases",
            Database,
            "postgres_list_schemas",
            false,
            "List all PostgreSQL databases on the server. Use for database discovery and PostgreSQL operations.",
            no_parameters(),
        ),
        spec(
            "get_container_logs",
            Monitoring,
            "monitoring_get_container_logs",
            false,
            "Get Docker container logs for a specific service. Useful for debugging and monitoring Docker containers.",
            json!({
                "type": "object",
                "properties": {
                    "container_name": {"type": "string", "description": "The name of the docker container."},
                    "line_count": {"type": "integer", "description": "Number of recent log lines to retrieve.", "default": 50}
                },
                "required": ["container_name"]
            }),
        ),
        spec(
            "list_directory",
            System,
            "filesystem_list",
            true,
            "List files and directories at a given path on the server. Requires admin privileges. Use for filesystem exploration.",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "The absolute or relative directory path to list."}
                },
                "required": ["path"]
            }),
        ),
        spec(
            "search_logs",
            Monitoring,
            "monitoring_search_logs",
            false,
            "Search through system logs using Loki/Grafana. Find specific log entries across all containers.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "LogQL query or search term"},
                    "time_range": {"type": "string", "description": "Time range (e.g., '1h', '24h', '7d')", "default": "1h"}
                },
                "required": ["query"]
            }),
        ),
        spec(
            "execute_sql",
            Database,
            "postgres_execute_sql",
            true,
            "Execute SQL queries on PostgreSQL databases. Use for database operations and queries.",
            json!({
                "type": "object",
                "properties": {
                    "database": {"type": "string", "description": "Target database name"},
                    "query": {"type": "string", "description": "SQL query to execute"}
                },
                "required": ["database", "query"]
            }),
        ),
        spec(
            "get_system_metrics",
            Monitoring,
            "monitoring_get_metrics",
            false,
            "Get system performance metrics from Netdata. Monitor CPU, memory, disk, and network usage.",
            json!({
                "type": "object",
                "properties": {
                    "metric_type": {"type": "string", "description": "Type of metric (cpu, memory, disk, network)", "default": "all"}
                }
            }),
        ),
        spec(
            "manage_docker",
            System,
            "docker_manage",
            true,
            "Manage Docker containers - start, stop, restart, or inspect containers.",
            json!({
                "type": "object",
                "properties": {
                    "action": {"type": "string", "description": "Action to perform (start, stop, restart, inspect, ps)"},
                    "container": {"type": "string", "description": "Container name or ID (optional for ps)"}
                },
                "required": ["action"]
            }),
        ),
        spec(
            "fetch_url",
            Network,
            "fetch_get_url",
            false,
            "Fetch and analyze content from a URL. Use for web scraping and API calls.",
            json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "URL to fetch"},
                    "headers": {"type": "object", "description": "Optional HTTP headers"}
                },
                "required": ["url"]
            }),
        ),
        spec(
            "list_workflows",
            Automation,
            "n8n_list_workflows",
            false,
            "List all n8n workflows. Use for workflow automation management and discovery.",
            no_parameters(),
        ),
        spec(
            "execute_workflow",
            Automation,
            "n8n_execute_workflow",
            true,
            "Execute an n8n workflow by ID or name. Trigger automation workflows.",
            json!({
                "type": "object",
                "properties": {
                    "workflow_id": {"type": "string", "description": "Workflow ID or name to execute"},
                    "data": {"type": "object", "description": "Optional input data for the workflow"}
                },
                "required": ["workflow_id"]
            }),
        ),
        spec(
            "get_workflow_executions",
            Automation,
            "n8n_get_executions",
            false,
            "Get execution history for n8n workflows. Monitor workflow runs and results.",
            json!({
                "type": "object",
                "properties": {
                    "workflow_id": {"type": "string", "description": "Workflow ID to get executions for (optional)"},
                    "limit": {"type": "integer", "description": "Number of executions to retrieve", "default": 10}
                }
            }),
        ),
        spec(
            "query_timeseries",
            TimeSeries,
            "timescaledb_query",
            false,
            "Query TimescaleDB for time-series data. Analyze metrics and historical data.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "SQL query for time-series data"},
                    "time_range": {"type": "string", "description": "Time range (e.g., '1h', '24h', '7d')", "default": "24h"}
                },
                "required": ["query"]
            }),
        ),
        spec(
            "list_hypertables",
            TimeSeries,
            "timescaledb_list_hypertables",
            false,
            "List all TimescaleDB hypertables. View time-series table structures.",
            no_parameters(),
        ),
        spec(
            "get_timeseries_stats",
            TimeSeries,
            "timescaledb_stats",
            false,
            "Get statistics for TimescaleDB hypertables. Monitor data retention and compression.",
            json!({
                "type": "object",
                "properties": {
                    "table_name": {"type": "string", "description": "Hypertable name (optional for all tables)"}
                }
            }),
        ),
        spec(
            "browser_navigate",
            Browser,
            "playwright_navigate",
            false,
            "Navigate to a URL using Playwright browser automation. Interact with web pages programmatically.",
            json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "URL to navigate to"},
                    "wait_for": {"type": "string", "description": "Element to wait for (CSS selector)"}
                },
                "required": ["url"]
            }),
        ),
        spec(
            "browser_screenshot",
            Browser,
            "playwright_screenshot",
            false,
            "Take a screenshot of a webpage using Playwright. The image is stored in object storage and its location returned.",
            json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "URL to screenshot"},
                    "full_page": {"type": "boolean", "description": "Capture full page", "default": true},
                    "selector": {"type": "string", "description": "CSS selector for specific element (optional)"}
                },
                "required": ["url"]
            }),
        ),
        spec(
            "browser_extract",
            Browser,
            "playwright_extract",
            false,
            "Extract data from a webpage using Playwright. Scrape content from dynamic websites.",
            json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "URL to extract from"},
                    "selector": {"type": "string", "description": "CSS selector for elements to extract"},
                    "attribute": {"type": "string", "description": "Attribute to extract (text, href, src, etc.)", "default": "text"}
                },
                "required": ["url", "selector"]
            }),
        ),
        spec(
            "minio_list_objects",
            Storage,
            "minio_list",
            false,
            "List objects in MinIO storage bucket. Browse files stored in S3-compatible object storage.",
            json!({
                "type": "object",
                "properties": {
                    "prefix": {"type": "string", "description": "Path prefix to filter objects (e.g., 'screenshots/', 'uploads/')"},
                    "recursive": {"type": "boolean", "description": "List recursively", "default": false}
                }
            }),
        ),
        spec(
            "minio_upload_object",
            Storage,
            "minio_upload",
            false,
            "Upload data to MinIO storage. Store files, images, or any data in S3-compatible storage.",
            json!({
                "type": "object",
                "properties": {
                    "object_name": {"type": "string", "description": "Object name/path in bucket (e.g., 'screenshots/google.png')"},
                    "data": {"type": "string", "description": "Base64 encoded data or text content to upload"},
                    "content_type": {"type": "string", "description": "MIME type (e.g., 'image/png', 'text/plain')", "default": "application/octet-stream"}
                },
                "required": ["object_name", "data"]
            }),
        ),
        spec(
            "minio_download_object",
            Storage,
            "minio_download",
            false,
            "Download object from MinIO storage. Retrieve files stored in S3-compatible storage.",
            json!({
                "type": "object",
                "properties": {
                    "object_name": {"type": "string", "description": "Object name/path in bucket"}
                },
                "required": ["object_name"]
            }),
        ),
        spec(
            "minio_delete_object",
            Storage,
            "minio_delete",
            true,
            "Delete object from MinIO storage. Remove files from S3-compatible storage.",
            json!({
                "type": "object",
                "properties": {
                    "object_name": {"type": "string", "description": "Object name/path to delete"}
                },
                "required": ["object_name"]
            }),
        ),
        spec(
            "minio_get_url",
            Storage,
            "minio_presign",
            false,
            "Get a public/presigned URL for an object in MinIO. Generate shareable links for stored files.",
            json!({
                "type": "object",
                "properties": {
                    "object_name": {"type": "string", "description": "Object name/path in bucket"},
                    "expiry_hours": {"type": "integer", "description": "URL expiry time in hours", "default": 24}
                },
                "required": ["object_name"]
            }),
        ),
    ]
}
