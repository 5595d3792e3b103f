//! End-to-end export tests against a mocked Notion API

use chrono::NaiveDate;
use notion_collector::config::{secret_string, CollectorConfig};
use notion_collector::core::export::ExportCoordinator;
use notion_collector::domain::RecordKind;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

const DAILY_DB: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const WEEKLY_DB: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
}

fn config(base_url: &str, output: &TempDir) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.notion.token = Some(secret_string("ntn_integration".to_string()));
    config.notion.daily_log_database_id = Some(DAILY_DB.to_string());
    config.notion.weekly_log_database_id = Some(WEEKLY_DB.to_string());
    config.notion.base_url = base_url.to_string();
    config.export.output_dir = output.path().join("output");
    config
}

fn daily_page() -> Value {
    json!({
        "object": "page",
        "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
        "created_time": "2024-06-02T08:00:00.000Z",
        "properties": {
            "Name": {"id": "title", "type": "title", "title": [{"plain_text": "Study systems design"}]},
            "Date": {"id": "d", "type": "date", "date": {"start": "2024-06-02"}},
            "Concepts": {"id": "c", "type": "relation", "relation": [{"id": "Caching"}], "has_more": false},
            "Strategies": {"id": "s", "type": "relation", "relation": [], "has_more": false},
            "Codebase": {"id": "r", "type": "relation", "relation": [{"id": "notion-collector"}], "has_more": false}
        }
    })
}

fn weekly_page() -> Value {
    json!({
        "object": "page",
        "id": "7f9a3c2e-0d4b-4e51-9a6b-1c2d3e4f5a6b",
        "created_time": "2024-05-27T09:00:00.000Z",
        "properties": {
            "上周总结": {"id": "title", "type": "title", "title": [{"plain_text": "完成了缓存设计"}]},
            "本周任务": {"id": "t", "type": "rich_text", "rich_text": []},
            "Date": {"id": "d", "type": "created_time", "created_time": "2024-05-27T09:00:00.000Z"}
        }
    })
}

fn query_body(results: Vec<Value>) -> String {
    json!({
        "object": "list",
        "results": results,
        "has_more": false,
        "next_cursor": null
    })
    .to_string()
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_weekly_run_writes_both_exports() {
    let mut server = mockito::Server::new_async().await;
    let daily = server
        .mock("POST", format!("/databases/{DAILY_DB}/query").as_str())
        .match_header("authorization", "Bearer ntn_integration")
        .match_body(mockito::Matcher::PartialJson(json!({
            "filter": {"property": "Date", "date": {"on_or_after": "2024-05-26"}}
        })))
        .with_status(200)
        .with_body(query_body(vec![daily_page()]))
        .create_async()
        .await;
    let weekly = server
        .mock("POST", format!("/databases/{WEEKLY_DB}/query").as_str())
        .with_status(200)
        .with_body(query_body(vec![weekly_page()]))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let coordinator = ExportCoordinator::from_config(config(&server.url(), &dir)).unwrap();
    let summary = coordinator.execute_export(run_date()).await.unwrap();

    daily.assert_async().await;
    weekly.assert_async().await;
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.total_records(), 2);

    let daily_path = dir.path().join("output").join("daily_2024-06-02.json");
    assert_eq!(
        read_json(&daily_path),
        json!([{
            "Name": "Study systems design",
            "Date": "2024-06-02",
            "Concepts": ["Caching"],
            "Strategies": [],
            "Experiments": [],
            "Insights": [],
            "Codebase": ["notion-collector"]
        }])
    );

    let weekly_path = dir.path().join("output").join("weekly_2024-06-02.json");
    assert_eq!(
        read_json(&weekly_path),
        json!([{
            "上周总结": "完成了缓存设计",
            "本周任务": null,
            "Date": "2024-05-27T09:00:00Z"
        }])
    );
    assert_eq!(
        summary.outcome(RecordKind::Weekly).map(|o| o.path.clone()),
        Some(weekly_path)
    );
}

#[tokio::test]
async fn test_empty_databases_write_empty_arrays() {
    let mut server = mockito::Server::new_async().await;
    for db in [DAILY_DB, WEEKLY_DB] {
        server
            .mock("POST", format!("/databases/{db}/query").as_str())
            .with_status(200)
            .with_body(query_body(Vec::new()))
            .create_async()
            .await;
    }

    let dir = TempDir::new().unwrap();
    let coordinator = ExportCoordinator::from_config(config(&server.url(), &dir)).unwrap();
    let summary = coordinator.execute_export(run_date()).await.unwrap();

    assert!(summary.is_successful());
    for label in ["daily", "weekly"] {
        let path = dir
            .path()
            .join("output")
            .join(format!("{label}_2024-06-02.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}

#[tokio::test]
async fn test_rerun_overwrites_same_file() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", format!("/databases/{DAILY_DB}/query").as_str())
        .with_status(200)
        .with_body(query_body(vec![daily_page()]))
        .create_async()
        .await;
    server
        .mock("POST", format!("/databases/{WEEKLY_DB}/query").as_str())
        .with_status(200)
        .with_body(query_body(Vec::new()))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let coordinator = ExportCoordinator::from_config(config(&server.url(), &dir)).unwrap();
    coordinator.execute_export(run_date()).await.unwrap();
    let first = fs::read_to_string(dir.path().join("output/daily_2024-06-02.json")).unwrap();
    coordinator.execute_export(run_date()).await.unwrap();
    let second = fs::read_to_string(dir.path().join("output/daily_2024-06-02.json")).unwrap();

    assert_eq!(first, second);
    let entries = fs::read_dir(dir.path().join("output")).unwrap().count();
    assert_eq!(entries, 2);
}

#[tokio::test]
async fn test_unauthorized_writes_nothing() {
    let mut server = mockito::Server::new_async().await;
    for db in [DAILY_DB, WEEKLY_DB] {
        server
            .mock("POST", format!("/databases/{db}/query").as_str())
            .with_status(401)
            .with_body(
                json!({
                    "object": "error",
                    "status": 401,
                    "code": "unauthorized",
                    "message": "API token is invalid."
                })
                .to_string(),
            )
            .create_async()
            .await;
    }

    let dir = TempDir::new().unwrap();
    let coordinator = ExportCoordinator::from_config(config(&server.url(), &dir)).unwrap();
    let summary = coordinator.execute_export(run_date()).await.unwrap();

    assert_eq!(summary.exit_code(), 3);
    assert_eq!(summary.errors.len(), 2);
    assert!(!dir.path().join("output").exists());
}

#[tokio::test]
async fn test_report_written_with_relation_titles() {
    let mut server = mockito::Server::new_async().await;
    let related = "11111111111111111111111111111111";
    let mut page = daily_page();
    page["properties"]["Concepts"]["relation"] = json!([{"id": related}]);
    page["properties"]["Codebase"]["relation"] = json!([]);

    server
        .mock("POST", format!("/databases/{DAILY_DB}/query").as_str())
        .with_status(200)
        .with_body(query_body(vec![page]))
        .create_async()
        .await;
    server
        .mock("POST", format!("/databases/{WEEKLY_DB}/query").as_str())
        .with_status(200)
        .with_body(query_body(vec![weekly_page()]))
        .create_async()
        .await;
    let lookup = server
        .mock("GET", format!("/pages/{related}").as_str())
        .with_status(200)
        .with_body(
            json!({
                "object": "page",
                "id": related,
                "properties": {
                    "Name": {"id": "title", "type": "title", "title": [{"plain_text": "Caching"}]}
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let mut cfg = config(&server.url(), &dir);
    cfg.export.resolve_relation_titles = true;
    cfg.export.write_report = true;
    let coordinator = ExportCoordinator::from_config(cfg).unwrap();
    let summary = coordinator.execute_export(run_date()).await.unwrap();

    lookup.assert_async().await;
    assert_eq!(summary.exit_code(), 0);

    let daily = read_json(&dir.path().join("output/daily_2024-06-02.json"));
    assert_eq!(daily[0]["Concepts"], json!(["Caching"]));

    let report_path = summary.report_path.clone().unwrap();
    assert_eq!(report_path, dir.path().join("output/report_2024-06-02.json"));
    let report = read_json(&report_path);
    assert_eq!(report["daily_logs"]["summary"]["total_entries"], 1);
    assert_eq!(report["daily_logs"]["relationships"]["concepts"], json!(["Caching"]));
    assert_eq!(report["weekly_logs"]["metadata"]["total_count"], 1);
    assert_eq!(report["report_metadata"]["report_type"], "combined");
}
