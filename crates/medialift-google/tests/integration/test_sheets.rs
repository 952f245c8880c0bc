//! Integration tests for the Sheets-shaped audit sink adapter

use medialift_core::ports::audit_sink::IAuditSink;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn list_tabs_returns_the_sheet_titles() {
    let (server, sink) = common::sheet_audit("sheet-1").await;

    Mock::given(method("GET"))
        .and(path("/spreadsheets/sheet-1"))
        .and(query_param("fields", "sheets.properties.title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sheets": [
                {"properties": {"title": "Config"}},
                {"properties": {"title": "Logs"}}
            ]
        })))
        .mount(&server)
        .await;

    let tabs = sink.list_tabs().await.unwrap();
    assert_eq!(tabs, vec!["Config", "Logs"]);
}

#[tokio::test]
async fn create_tab_sends_the_add_sheet_request() {
    let (server, sink) = common::sheet_audit("sheet-1").await;

    Mock::given(method("POST"))
        .and(path("/spreadsheets/sheet-1:batchUpdate"))
        .and(body_json(serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": "Logs",
                        "gridProperties": {"rowCount": 1, "columnCount": 7},
                    }
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    sink.create_tab("Logs", 7).await.unwrap();
}

#[tokio::test]
async fn append_row_targets_the_tab() {
    let (server, sink) = common::sheet_audit("sheet-1").await;

    let row = vec![
        "2026-08-06T12:00:00+00:00".to_string(),
        "B.mp4".to_string(),
        "file-2".to_string(),
        "xyz".to_string(),
        "https://www.youtube.com/watch?v=xyz".to_string(),
        "rename".to_string(),
        "Renamed to xyz.mp4".to_string(),
    ];

    Mock::given(method("POST"))
        .and(path("/spreadsheets/sheet-1/values/Logs!A1:append"))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(body_json(serde_json::json!({"values": [row.clone()]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    sink.append_row("Logs", &row).await.unwrap();
}

#[tokio::test]
async fn sink_errors_propagate_to_the_caller() {
    let (server, sink) = common::sheet_audit("sheet-1").await;

    Mock::given(method("POST"))
        .and(path("/spreadsheets/sheet-1/values/Logs!A1:append"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let row = vec!["x".to_string()];
    assert!(sink.append_row("Logs", &row).await.is_err());
}
