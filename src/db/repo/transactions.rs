//! Transaction row operations for the repository.

use crate::domain::{Amount, RecalcScope, SubaccountId, TimeMs, Transaction, TransactionId};
use futures::TryStreamExt;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, Row};

use super::Repository;

const SELECT_TRANSACTIONS: &str =
    "SELECT id, subaccount_id, started_at, amount, balance FROM transactions";

impl Repository {
    /// Insert a transaction, replacing any existing row with the same id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_transaction(&self, tx: &Transaction) -> Result<(), sqlx::Error> {
        self.insert_transactions_batch(std::slice::from_ref(tx))
            .await
            .map(|_| ())
    }

    /// Insert multiple transactions in a single database transaction.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_transactions_batch(
        &self,
        transactions: &[Transaction],
    ) -> Result<usize, sqlx::Error> {
        if transactions.is_empty() {
            return Ok(0);
        }

        let created_at = chrono::Utc::now().timestamp_millis();
        let _guard = self.write_lock.lock().await;
        let mut db_tx = self.pool.begin().await?;

        for tx in transactions {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO transactions
                (id, subaccount_id, started_at, amount, balance, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(tx.id.as_str())
            .bind(tx.subaccount_id.as_str())
            .bind(tx.started_at.as_ms())
            .bind(tx.amount.to_stored_string())
            .bind(tx.balance.to_stored_string())
            .bind(created_at)
            .execute(&mut *db_tx)
            .await?;
        }

        db_tx.commit().await?;
        Ok(transactions.len())
    }

    /// Look up a single transaction by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_TRANSACTIONS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(transaction_from_row).transpose()
    }

    /// Read every transaction in scope.
    ///
    /// Rows are streamed off the connection instead of buffered by the driver,
    /// so large ledgers are decoded incrementally. No ORDER BY: the caller
    /// imposes ledger order itself.
    ///
    /// # Errors
    /// Returns an error if the query or row decoding fails.
    pub async fn query_transactions(
        &self,
        scope: &RecalcScope,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_TRANSACTIONS);

        if let RecalcScope::Subaccounts(ids) = scope {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            builder.push(" WHERE subaccount_id IN (");
            let mut separated = builder.separated(", ");
            for id in ids {
                separated.push_bind(id.as_str());
            }
            separated.push_unseparated(")");
        }

        let mut rows = builder.build().fetch(&self.pool);
        let mut transactions = Vec::new();
        while let Some(row) = rows.try_next().await? {
            transactions.push(transaction_from_row(&row)?);
        }

        Ok(transactions)
    }

    /// Count rows per sub-account.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_transactions(&self) -> Result<Vec<(SubaccountId, i64)>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT subaccount_id, COUNT(*) AS n
            FROM transactions
            GROUP BY subaccount_id
            ORDER BY subaccount_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    SubaccountId::new(row.get::<String, _>("subaccount_id")),
                    row.get::<i64, _>("n"),
                )
            })
            .collect())
    }
}

/// Decode a row. Amount and balance text that does not parse is kept as
/// `Amount::Invalid` rather than failing the whole read.
fn transaction_from_row(row: &SqliteRow) -> Result<Transaction, sqlx::Error> {
    let amount: Option<String> = row.try_get("amount")?;
    let balance: Option<String> = row.try_get("balance")?;

    Ok(Transaction::new(
        TransactionId::new(row.try_get::<String, _>("id")?),
        SubaccountId::new(row.try_get::<String, _>("subaccount_id")?),
        TimeMs::new(row.try_get("started_at")?),
        Amount::parse(amount.as_deref().unwrap_or_default()),
        Amount::parse(balance.as_deref().unwrap_or_default()),
    ))
}
