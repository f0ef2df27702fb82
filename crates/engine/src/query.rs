//! Read-only projections over the ledger store

use rust_decimal::Decimal;
use unitybank_core::{
    AccountStatus, BankError, CustomerAccountRow, StatementSummary, TxnRecord,
};
use unitybank_store::LedgerStore;

/// Global transaction listing page cap when no account is given.
pub const DEFAULT_TXN_PAGE: u32 = 200;

/// Number of transactions included in a statement summary.
const STATEMENT_RECENT: u32 = 5;

/// The reporting facade. Reads never open a write transaction.
pub struct LedgerQueries<S> {
    store: S,
}

impl<S: LedgerStore> LedgerQueries<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Balance lookup authorized by PIN alone (the PIN authenticates, so no
    /// owner-name check applies).
    pub async fn balance(&self, account_no: &str, pin: &str) -> Result<Decimal, BankError> {
        let account = self
            .store
            .fetch_account(account_no)
            .await?
            .ok_or(BankError::NotFound { entity: "account" })?;

        if account.status != AccountStatus::Active {
            return Err(BankError::AccountBlocked);
        }
        if account.pin != pin {
            return Err(BankError::AuthFailed);
        }
        Ok(account.balance)
    }

    /// Transaction history, ascending by timestamp then id: the full history
    /// of one account, or the newest `limit` rows globally (default cap
    /// [`DEFAULT_TXN_PAGE`]).
    pub async fn list_transactions(
        &self,
        account_no: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<TxnRecord>, BankError> {
        match account_no {
            Some(no) => self.store.transactions_for_account(no).await,
            None => {
                self.store
                    .recent_transactions(limit.unwrap_or(DEFAULT_TXN_PAGE))
                    .await
            }
        }
    }

    /// Every customer with their accounts, ordered by customer id; customers
    /// without an account keep a row with absent account fields.
    pub async fn list_customer_accounts(&self) -> Result<Vec<CustomerAccountRow>, BankError> {
        self.store.list_customer_accounts().await
    }

    /// The payload for an account statement notification: balance, owner,
    /// contact and the five most recent transactions, newest first.
    pub async fn statement_summary(
        &self,
        account_no: &str,
    ) -> Result<StatementSummary, BankError> {
        let account = self
            .store
            .fetch_account(account_no)
            .await?
            .ok_or(BankError::NotFound { entity: "account" })?;

        let customer = self
            .store
            .fetch_customer(account.cust_id)
            .await?
            .ok_or(BankError::NotFound { entity: "customer" })?;

        let recent = self
            .store
            .latest_for_account(account_no, STATEMENT_RECENT)
            .await?;

        Ok(StatementSummary {
            account_no: account.account_no,
            cust_name: account.cust_name,
            mobile: customer.mobile,
            balance: account.balance,
            recent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{AccountOps, CustomerRegistration};
    use rust_decimal_macros::dec;
    use unitybank_core::{AccountType, SessionContext, TxnType};
    use unitybank_store::MemoryLedger;

    fn session() -> SessionContext {
        SessionContext::customer("Asha Rao")
    }

    async fn seeded() -> (AccountOps<MemoryLedger>, LedgerQueries<MemoryLedger>, String) {
        let ledger = MemoryLedger::new();
        let ops = AccountOps::new(ledger.clone());
        let queries = LedgerQueries::new(ledger);

        let id = ops
            .register_customer(
                &session(),
                CustomerRegistration {
                    name: "Asha Rao".to_string(),
                    gender: "Female".to_string(),
                    dob: "1990-07-14".to_string(),
                    mobile: "9876543210".to_string(),
                    email: "asha@example.com".to_string(),
                    address: "12 MG Road".to_string(),
                    password: "secret".to_string(),
                },
            )
            .await
            .unwrap();
        let acc = ops
            .open_account(&session(), id, AccountType::Savings, "4321", "100.00")
            .await
            .unwrap()
            .account_no;
        (ops, queries, acc)
    }

    #[tokio::test]
    async fn balance_authorizes_by_pin_only() {
        let (ops, queries, acc) = seeded().await;

        assert_eq!(queries.balance(&acc, "4321").await.unwrap(), dec!(100.00));
        assert_eq!(
            queries.balance(&acc, "0000").await.unwrap_err(),
            BankError::AuthFailed
        );
        assert_eq!(
            queries.balance("BNK00000", "4321").await.unwrap_err(),
            BankError::NotFound { entity: "account" }
        );

        ops.set_account_status(&session(), &acc, unitybank_core::AccountStatus::Blocked)
            .await
            .unwrap();
        // Blocked reported even with the wrong pin supplied.
        assert_eq!(
            queries.balance(&acc, "0000").await.unwrap_err(),
            BankError::AccountBlocked
        );
    }

    #[tokio::test]
    async fn statement_summary_carries_contact_and_latest_five() {
        let (ops, queries, acc) = seeded().await;
        for i in 1..=7 {
            ops.deposit(&session(), &acc, "Asha Rao", "4321", &format!("{}.00", i))
                .await
                .unwrap();
        }

        let summary = queries.statement_summary(&acc).await.unwrap();
        assert_eq!(summary.cust_name, "Asha Rao");
        assert_eq!(summary.mobile, "9876543210");
        assert_eq!(summary.balance, dec!(128.00));
        assert_eq!(summary.recent.len(), 5);
        // Newest first.
        assert_eq!(summary.recent[0].amount, dec!(7.00));
        assert_eq!(summary.recent[4].amount, dec!(3.00));

        assert_eq!(
            queries.statement_summary("BNK00000").await.unwrap_err(),
            BankError::NotFound { entity: "account" }
        );
    }

    #[tokio::test]
    async fn listing_prefers_account_history_over_global_page() {
        let (ops, queries, acc) = seeded().await;
        ops.deposit(&session(), &acc, "Asha Rao", "4321", "1.00")
            .await
            .unwrap();

        let for_account = queries.list_transactions(Some(&acc), None).await.unwrap();
        assert_eq!(for_account.len(), 2);
        assert_eq!(for_account[0].txn_type, TxnType::Deposit);

        let global = queries.list_transactions(None, Some(1)).await.unwrap();
        assert_eq!(global.len(), 1);
        assert_eq!(global[0].amount, dec!(1.00));
    }
}
