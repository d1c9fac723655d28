use crate::models::SalesTransaction;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::{Duration, Instant};

/// 批量插入单条语句超时
const INSERT_TIMEOUT: Duration = Duration::from_secs(30);

/// 建表: `sales_transactions` (不存在时创建)
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sales_transactions (
            document_date DATE NOT NULL,
            invoice_no TEXT,
            customer_code TEXT,
            customer_name TEXT,
            province TEXT,
            sales_rep_code TEXT,
            sales_rep_name TEXT,
            sales_team TEXT,
            product_code TEXT,
            product_group TEXT,
            product_name TEXT,
            quantity NUMERIC NOT NULL DEFAULT 0,
            unit_of_measure TEXT,
            unit_price NUMERIC NOT NULL DEFAULT 0,
            discount_percent NUMERIC NOT NULL DEFAULT 0,
            bill_discount_percent NUMERIC NOT NULL DEFAULT 0,
            unit_price_non_vat NUMERIC NOT NULL DEFAULT 0,
            total_amount_non_vat NUMERIC NOT NULL DEFAULT 0,
            batch_id TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_sales_transactions_batch_id \
         ON sales_transactions (batch_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// 批量插入一次导入的全部有效行 (单个事务, 分块 INSERT)
/// 任一分块失败则整体回滚
pub async fn insert_transactions(
    pool: &PgPool,
    rows: &[SalesTransaction],
    chunk_size: usize,
) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }

    let start_time = Instant::now();
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for chunk in rows.chunks(chunk_size.max(1)) {
        match insert_chunk(&mut tx, chunk).await {
            Ok(affected) => inserted += affected,
            Err(e) => {
                tracing::error!("✗ INSERT failed after {} rows, rolling back: {:?}", inserted, e);
                tx.rollback().await?;
                return Err(e);
            }
        }
    }

    tx.commit().await?;
    tracing::info!(
        "✓ Inserted {} rows into sales_transactions in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

async fn insert_chunk(
    tx: &mut Transaction<'_, Postgres>,
    rows: &[SalesTransaction],
) -> Result<u64, sqlx::Error> {
    let mut query_builder = sqlx::QueryBuilder::new(
        "INSERT INTO sales_transactions (
            document_date, invoice_no, customer_code, customer_name, province,
            sales_rep_code, sales_rep_name, sales_team,
            product_code, product_group, product_name,
            quantity, unit_of_measure, unit_price,
            discount_percent, bill_discount_percent,
            unit_price_non_vat, total_amount_non_vat, batch_id
        ) ",
    );

    query_builder.push_values(rows, |mut b, row| {
        b.push_bind(row.document_date)
            .push_bind(&row.invoice_no)
            .push_bind(&row.customer_code)
            .push_bind(&row.customer_name)
            .push_bind(&row.province)
            .push_bind(&row.sales_rep_code)
            .push_bind(&row.sales_rep_name)
            .push_bind(&row.sales_team)
            .push_bind(&row.product_code)
            .push_bind(&row.product_group)
            .push_bind(&row.product_name)
            .push_bind(row.quantity.clone())
            .push_bind(&row.unit_of_measure)
            .push_bind(row.unit_price.clone())
            .push_bind(row.discount_percent.clone())
            .push_bind(row.bill_discount_percent.clone())
            .push_bind(row.unit_price_non_vat.clone())
            .push_bind(row.total_amount_non_vat.clone())
            .push_bind(&row.batch_id);
    });

    tracing::debug!("Executing INSERT for {} rows...", rows.len());
    let execute_start = Instant::now();

    match tokio::time::timeout(INSERT_TIMEOUT, query_builder.build().execute(&mut **tx)).await {
        Ok(Ok(result)) => {
            tracing::debug!(
                "INSERT affected {} rows in {:?}",
                result.rows_affected(),
                execute_start.elapsed()
            );
            Ok(result.rows_affected())
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            tracing::error!("✗ INSERT timed out (>{:?})", INSERT_TIMEOUT);
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}

/// 按批次号删除 (整批回滚)
pub async fn delete_batch(pool: &PgPool, batch_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sales_transactions WHERE batch_id = $1")
        .bind(batch_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// 统计批次行数
pub async fn count_batch(pool: &PgPool, batch_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT count(*) FROM sales_transactions WHERE batch_id = $1")
        .bind(batch_id)
        .fetch_one(pool)
        .await
}

