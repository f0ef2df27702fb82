//! In-memory ledger store
//!
//! Implements the same repository traits as the SQLite backend so the
//! operations engine can be exercised without a database. A transaction
//! takes the single state lock and mutates a working copy; commit publishes
//! the copy, drop discards it. That serializes all writers, which is
//! stricter than the production store but preserves its guarantees.

use crate::repo::{
    AccountRepository, CustomerRepository, LedgerStore, LedgerTx, TransactionRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use unitybank_core::{
    Account, AccountStatus, BankError, Customer, CustomerAccountRow, NewCustomer, NewTxn,
    TxnRecord,
};

#[derive(Debug, Clone, Default)]
struct State {
    customers: BTreeMap<i64, Customer>,
    accounts: BTreeMap<String, Account>,
    txns: Vec<TxnRecord>,
    next_cust_id: i64,
    next_txn_id: i64,
}

/// Heap-backed ledger store for tests.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<State>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for MemoryLedger {
    async fn insert_customer(&self, customer: NewCustomer) -> Result<i64, BankError> {
        let mut state = self.state.lock().await;
        if state.customers.values().any(|c| c.email == customer.email) {
            return Err(BankError::Validation { field: "email" });
        }

        state.next_cust_id += 1;
        let id = state.next_cust_id;
        state.customers.insert(
            id,
            Customer {
                id,
                name: customer.name,
                gender: customer.gender,
                dob: customer.dob,
                mobile: customer.mobile,
                email: customer.email,
                address: customer.address,
                password: customer.password,
            },
        );
        Ok(id)
    }

    async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, BankError> {
        Ok(self.state.lock().await.customers.get(&id).cloned())
    }

    async fn list_customer_accounts(&self) -> Result<Vec<CustomerAccountRow>, BankError> {
        let state = self.state.lock().await;
        let mut rows = Vec::new();

        // BTreeMap iteration gives ascending customer ids.
        for customer in state.customers.values() {
            let accounts: Vec<&Account> = state
                .accounts
                .values()
                .filter(|a| a.cust_id == customer.id)
                .collect();

            if accounts.is_empty() {
                rows.push(CustomerAccountRow {
                    cust_id: customer.id,
                    name: customer.name.clone(),
                    mobile: customer.mobile.clone(),
                    account_no: None,
                    account_type: None,
                    balance: None,
                    status: None,
                });
            } else {
                for account in accounts {
                    rows.push(CustomerAccountRow {
                        cust_id: customer.id,
                        name: customer.name.clone(),
                        mobile: customer.mobile.clone(),
                        account_no: Some(account.account_no.clone()),
                        account_type: Some(account.account_type),
                        balance: Some(account.balance),
                        status: Some(account.status),
                    });
                }
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl AccountRepository for MemoryLedger {
    async fn fetch_account(&self, account_no: &str) -> Result<Option<Account>, BankError> {
        Ok(self.state.lock().await.accounts.get(account_no).cloned())
    }

    async fn account_no_exists(&self, account_no: &str) -> Result<bool, BankError> {
        Ok(self.state.lock().await.accounts.contains_key(account_no))
    }
}

#[async_trait]
impl TransactionRepository for MemoryLedger {
    async fn transactions_for_account(
        &self,
        account_no: &str,
    ) -> Result<Vec<TxnRecord>, BankError> {
        let state = self.state.lock().await;
        let mut txns: Vec<TxnRecord> = state
            .txns
            .iter()
            .filter(|t| t.account_no == account_no)
            .cloned()
            .collect();
        txns.sort_by(|a, b| (a.txn_date, a.txn_id).cmp(&(b.txn_date, b.txn_id)));
        Ok(txns)
    }

    async fn recent_transactions(&self, limit: u32) -> Result<Vec<TxnRecord>, BankError> {
        let state = self.state.lock().await;
        let mut txns = state.txns.clone();
        txns.sort_by(|a, b| (a.txn_date, a.txn_id).cmp(&(b.txn_date, b.txn_id)));

        let skip = txns.len().saturating_sub(limit as usize);
        Ok(txns.split_off(skip))
    }

    async fn latest_for_account(
        &self,
        account_no: &str,
        n: u32,
    ) -> Result<Vec<TxnRecord>, BankError> {
        let mut txns = self.transactions_for_account(account_no).await?;
        txns.reverse();
        txns.truncate(n as usize);
        Ok(txns)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, BankError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<State>,
    working: State,
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn account_for_update(
        &mut self,
        account_no: &str,
    ) -> Result<Option<Account>, BankError> {
        Ok(self.working.accounts.get(account_no).cloned())
    }

    async fn insert_account(&mut self, account: &Account) -> Result<(), BankError> {
        if self.working.accounts.contains_key(&account.account_no) {
            return Err(BankError::DuplicateIdentifier);
        }
        self.working
            .accounts
            .insert(account.account_no.clone(), account.clone());
        Ok(())
    }

    async fn update_balance(
        &mut self,
        account_no: &str,
        new_balance: Decimal,
    ) -> Result<(), BankError> {
        let account = self
            .working
            .accounts
            .get_mut(account_no)
            .ok_or(BankError::NotFound { entity: "account" })?;
        account.balance = new_balance;
        Ok(())
    }

    async fn insert_txn(&mut self, txn: NewTxn) -> Result<(), BankError> {
        self.working.next_txn_id += 1;
        let record = TxnRecord {
            txn_id: self.working.next_txn_id,
            account_no: txn.account_no,
            cust_name: txn.cust_name,
            txn_type: txn.txn_type,
            amount: txn.amount,
            txn_date: Utc::now(),
        };
        self.working.txns.push(record);
        Ok(())
    }

    async fn update_pin(&mut self, account_no: &str, pin: &str) -> Result<(), BankError> {
        let account = self
            .working
            .accounts
            .get_mut(account_no)
            .ok_or(BankError::NotFound { entity: "account" })?;
        account.pin = pin.to_string();
        Ok(())
    }

    async fn update_status(
        &mut self,
        account_no: &str,
        status: AccountStatus,
    ) -> Result<bool, BankError> {
        match self.working.accounts.get_mut(account_no) {
            Some(account) => {
                account.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit(mut self: Box<Self>) -> Result<(), BankError> {
        *self.guard = self.working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use unitybank_core::{AccountType, TxnType};

    fn new_customer() -> NewCustomer {
        NewCustomer {
            name: "Ravi Iyer".to_string(),
            gender: "Male".to_string(),
            dob: NaiveDate::from_ymd_opt(1985, 1, 2).unwrap(),
            mobile: "9000000001".to_string(),
            email: "ravi@example.com".to_string(),
            address: "4 Park Street".to_string(),
            password: "pw".to_string(),
        }
    }

    #[tokio::test]
    async fn commit_publishes_and_drop_discards() {
        let ledger = MemoryLedger::new();
        let cust_id = ledger.insert_customer(new_customer()).await.unwrap();

        let account = Account {
            account_no: "BNK11111".to_string(),
            cust_id,
            cust_name: "Ravi Iyer".to_string(),
            account_type: AccountType::Current,
            pin: "9999".to_string(),
            balance: dec!(10.00),
            routing_code: "IFSC9999".to_string(),
            status: AccountStatus::Active,
        };

        let mut tx = ledger.begin().await.unwrap();
        tx.insert_account(&account).await.unwrap();
        tx.commit().await.unwrap();
        assert!(ledger.account_no_exists("BNK11111").await.unwrap());

        {
            let mut tx = ledger.begin().await.unwrap();
            tx.update_balance("BNK11111", dec!(0.00)).await.unwrap();
            tx.insert_txn(NewTxn {
                account_no: "BNK11111".to_string(),
                cust_name: "Ravi Iyer".to_string(),
                txn_type: TxnType::Withdraw,
                amount: dec!(10.00),
            })
            .await
            .unwrap();
            // dropped: nothing published
        }

        let fetched = ledger.fetch_account("BNK11111").await.unwrap().unwrap();
        assert_eq!(fetched.balance, dec!(10.00));
        assert!(ledger
            .transactions_for_account("BNK11111")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn txn_ids_are_sequential() {
        let ledger = MemoryLedger::new();
        let cust_id = ledger.insert_customer(new_customer()).await.unwrap();

        let account = Account {
            account_no: "BNK22222".to_string(),
            cust_id,
            cust_name: "Ravi Iyer".to_string(),
            account_type: AccountType::Savings,
            pin: "1234".to_string(),
            balance: dec!(0.00),
            routing_code: "IFSC1000".to_string(),
            status: AccountStatus::Active,
        };

        let mut tx = ledger.begin().await.unwrap();
        tx.insert_account(&account).await.unwrap();
        for _ in 0..3 {
            tx.insert_txn(NewTxn {
                account_no: "BNK22222".to_string(),
                cust_name: "Ravi Iyer".to_string(),
                txn_type: TxnType::Deposit,
                amount: dec!(1.00),
            })
            .await
            .unwrap();
        }
        tx.commit().await.unwrap();

        let txns = ledger.transactions_for_account("BNK22222").await.unwrap();
        let ids: Vec<i64> = txns.iter().map(|t| t.txn_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
