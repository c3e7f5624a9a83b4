//! `TransactionStore` implementation over SQLite.

use crate::domain::{RecalcScope, SubaccountId, Transaction};
use crate::store::{BalanceUpdate, StoreError, TransactionStore};
use async_trait::async_trait;

use super::Repository;

#[async_trait]
impl TransactionStore for Repository {
    async fn fetch_transactions(
        &self,
        scope: &RecalcScope,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.query_transactions(scope).await?)
    }

    /// Rewrites `balance` for one sub-account inside a single SQLite transaction.
    ///
    /// An update that matches no row of this sub-account rolls the batch back.
    async fn update_balances(
        &self,
        subaccount_id: &SubaccountId,
        updates: &[BalanceUpdate],
    ) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let updated_at = chrono::Utc::now().timestamp_millis();
        let _guard = self.write_lock.lock().await;
        let mut db_tx = self.pool.begin().await?;

        for update in updates {
            let result = sqlx::query(
                r#"
                UPDATE transactions
                SET balance = ?, balance_updated_at = ?
                WHERE id = ? AND subaccount_id = ?
                "#,
            )
            .bind(update.new_balance.to_canonical_string())
            .bind(updated_at)
            .bind(update.transaction_id.as_str())
            .bind(subaccount_id.as_str())
            .execute(&mut *db_tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping db_tx rolls back the earlier updates in this batch.
                return Err(StoreError::UnknownTransaction(
                    update.transaction_id.clone(),
                ));
            }
        }

        db_tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::setup_test_db;
    use super::*;
    use crate::domain::{Amount, Decimal, TimeMs, TransactionId};
    use sqlx::Row;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_tx(id: &str, subaccount: &str, amount: &str, balance: &str) -> Transaction {
        Transaction::with_values(id, subaccount, 1000, dec(amount), dec(balance))
    }

    fn update(id: &str, balance: &str) -> BalanceUpdate {
        BalanceUpdate {
            transaction_id: TransactionId::new(id),
            new_balance: dec(balance),
        }
    }

    #[tokio::test]
    async fn test_update_balances_only_touches_balance() {
        let (repo, _temp) = setup_test_db().await;
        repo.insert_transaction(&make_tx("t1", "acc", "100", "99"))
            .await
            .unwrap();

        repo.update_balances(&SubaccountId::new("acc"), &[update("t1", "100")])
            .await
            .expect("update failed");

        let loaded = repo
            .get_transaction(&TransactionId::new("t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.amount, Amount::Value(dec("100")));
        assert_eq!(loaded.balance, Amount::Value(dec("100")));
        assert_eq!(loaded.started_at, TimeMs::new(1000));

        let row = sqlx::query("SELECT balance_updated_at FROM transactions WHERE id = 't1'")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert!(row.get::<Option<i64>, _>("balance_updated_at").is_some());
    }

    #[tokio::test]
    async fn test_update_balances_rolls_back_on_unknown_row() {
        let (repo, _temp) = setup_test_db().await;
        repo.insert_transactions_batch(&[
            make_tx("t1", "acc", "100", "99"),
            make_tx("t2", "other", "5", "5"),
        ])
        .await
        .unwrap();

        // t2 belongs to another sub-account, so the batch must not apply.
        let result = repo
            .update_balances(
                &SubaccountId::new("acc"),
                &[update("t1", "100"), update("t2", "0")],
            )
            .await;
        assert!(matches!(result, Err(StoreError::UnknownTransaction(_))));

        let t1 = repo
            .get_transaction(&TransactionId::new("t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(t1.balance, Amount::Value(dec("99")));
        let t2 = repo
            .get_transaction(&TransactionId::new("t2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(t2.balance, Amount::Value(dec("5")));
    }

    #[tokio::test]
    async fn test_fetch_via_trait() {
        let (repo, _temp) = setup_test_db().await;
        repo.insert_transaction(&make_tx("t1", "acc", "1", "1"))
            .await
            .unwrap();

        let store: &dyn TransactionStore = &repo;
        let rows = store.fetch_transactions(&RecalcScope::All).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
