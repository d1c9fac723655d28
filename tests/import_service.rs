//! Service paths that must never reach the database. The pool is lazy, so
//! no Postgres server is needed.

use sales_ingest::etl::WorkbookFormat;
use sales_ingest::models::{ImportSummary, IngestOutcome, RowCounts};
use sales_ingest::{ImportService, IngestError, IngestPipeline};
use sqlx::postgres::PgPoolOptions;

fn service() -> ImportService {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://unused@localhost:1/unused")
        .unwrap();
    ImportService::new(pool, IngestPipeline::default(), 1000)
}

#[tokio::test]
async fn undecodable_upload_is_an_input_error() {
    let err = service()
        .import(b"\x00\x01garbage".to_vec(), WorkbookFormat::Spreadsheet, None)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Decode(_)));
    assert!(err.is_input_error());
}

#[tokio::test]
async fn undated_upload_skips_the_store() {
    let csv = "วันที่/เดือน/ปี เอกสาร,เลขที่บิล\nรวม,IV1\n,IV2\n";
    let outcome = service()
        .import(csv.as_bytes().to_vec(), WorkbookFormat::Csv, Some("b-1".into()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        IngestOutcome::NoUsableRows {
            batch_id: Some("b-1".into()),
            counts: RowCounts { seen: 2, admitted: 0 }
        }
    );
    let summary = ImportSummary::from(outcome);
    assert!(!summary.success);
    assert_eq!(summary.rows, 0);
}

#[tokio::test]
async fn prepare_resolves_rows_without_writing() {
    let csv = "DOCDATE,INVNO,QTY\n01/02/2024,IV9,5\n";
    let batch = service()
        .prepare(csv.as_bytes().to_vec(), WorkbookFormat::Csv, Some("b-2".into()))
        .await
        .unwrap();

    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].invoice_no.as_deref(), Some("IV9"));
    assert_eq!(batch.rows[0].batch_id.as_deref(), Some("b-2"));
}
