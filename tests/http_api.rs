//! HTTP surface over a pool that can never connect: every path here either
//! stays off the database or must report the storage failure.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sales_ingest::{api, ImportService, IngestPipeline};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

const BOUNDARY: &str = "sales-ingest-boundary";
const UNDATED_CSV: &str = "วันที่/เดือน/ปี เอกสาร,เลขที่บิล\nรวม,IV1\n";
const DATED_CSV: &str = "วันที่/เดือน/ปี เอกสาร,เลขที่บิล,จำนวน\n05/03/2024,IV1,2\n";

fn app() -> Router {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(300))
        .connect_lazy("postgres://unused@127.0.0.1:1/unused")
        .unwrap();
    let service = ImportService::new(pool, IngestPipeline::default(), 1000);
    api::router(Arc::new(service), 1024 * 1024)
}

enum Part<'a> {
    File(&'a str, &'a [u8]),
    Text(&'a str, &'a str),
}

fn multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File(file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn is_uuid(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok())
}

#[tokio::test]
async fn health_check_answers_ok() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let (status, body) = send(multipart("/api/upload", &[Part::Text("batch_id", "b-1")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["rows"], 0);
    assert!(body["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn undecodable_workbook_is_a_client_error() {
    let (status, body) = send(multipart(
        "/api/upload",
        &[Part::File("sales.xlsx", b"not a spreadsheet at all")],
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_store_is_a_server_error() {
    let (status, body) = send(multipart(
        "/api/upload",
        &[Part::File("sales.csv", DATED_CSV.as_bytes())],
    ))
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["rows"], 0);
    assert!(body["error"].as_str().unwrap().contains("database"));
}

#[tokio::test]
async fn undated_upload_succeeds_without_rows() {
    let (status, body) = send(multipart(
        "/api/upload",
        &[Part::File("sales.csv", UNDATED_CSV.as_bytes())],
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["rows"], 0);
    assert!(body.get("error").is_none());
    assert!(body.get("batch_id").is_none());
}

#[tokio::test]
async fn tagged_import_generates_a_token() {
    let (status, body) = send(multipart(
        "/api/batches",
        &[Part::File("sales.csv", UNDATED_CSV.as_bytes())],
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(is_uuid(&body["batch_id"]), "{body}");
}

#[tokio::test]
async fn tagged_import_keeps_a_supplied_token() {
    let (_, body) = send(multipart(
        "/api/batches",
        &[
            Part::Text("batch_id", " run-42 "),
            Part::File("sales.csv", UNDATED_CSV.as_bytes()),
        ],
    ))
    .await;
    assert_eq!(body["batch_id"], "run-42");
}

#[tokio::test]
async fn blank_batch_id_is_ignored() {
    let (_, body) = send(multipart(
        "/api/batches",
        &[
            Part::Text("batch_id", "   "),
            Part::File("sales.csv", UNDATED_CSV.as_bytes()),
        ],
    ))
    .await;
    assert!(is_uuid(&body["batch_id"]), "{body}");

    let (_, body) = send(multipart(
        "/api/upload",
        &[
            Part::Text("batch_id", "   "),
            Part::File("sales.csv", UNDATED_CSV.as_bytes()),
        ],
    ))
    .await;
    assert!(body.get("batch_id").is_none());
}

#[tokio::test]
async fn rollback_reports_storage_failure() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/batches/run-42")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["batch_id"], "run-42");
    assert_eq!(body["rows_deleted"], 0);
}
