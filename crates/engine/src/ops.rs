//! Account operations - the validated, atomic write path
//!
//! Every operation is a self-contained transaction against the ledger
//! store: read the account rows, run the authorization chain, write the new
//! balances and the paired transaction records, commit. The check order is
//! part of the contract - a blocked account is always reported as blocked
//! before the PIN is even looked at - and amounts are validated before the
//! store is touched at all.

use crate::idgen;
use tracing::info;
use unitybank_core::{
    normalize, validate_date, validate_mobile, validate_pin, Account, AccountStatus, AccountType,
    Amount, BankError, NewCustomer, NewTxn, SessionContext, TxnType,
};
use unitybank_store::LedgerStore;

/// Customer registration payload as entered (KYC form fields).
#[derive(Debug, Clone)]
pub struct CustomerRegistration {
    pub name: String,
    pub gender: String,
    /// `YYYY-MM-DD`
    pub dob: String,
    /// 10 decimal digits
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// Identifiers handed back by a successful account opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedAccount {
    pub account_no: String,
    pub routing_code: String,
}

/// The account operations engine. Stateless between calls; generic over the
/// ledger store so tests run against the in-memory backend.
pub struct AccountOps<S> {
    store: S,
}

impl<S: LedgerStore> AccountOps<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a customer (KYC) and return the assigned id.
    pub async fn register_customer(
        &self,
        session: &SessionContext,
        reg: CustomerRegistration,
    ) -> Result<i64, BankError> {
        let dob = validate_date("dob", &reg.dob)?;
        validate_mobile("mobile", &reg.mobile)?;

        let id = self
            .store
            .insert_customer(NewCustomer {
                name: reg.name.trim().to_string(),
                gender: reg.gender,
                dob,
                mobile: reg.mobile.trim().to_string(),
                email: reg.email.trim().to_string(),
                address: reg.address,
                password: reg.password,
            })
            .await?;

        info!(operator = %session.operator, cust_id = id, "customer registered");
        Ok(id)
    }

    /// Open an account for an existing customer with a positive initial
    /// deposit. Returns the generated account number and routing code.
    pub async fn open_account(
        &self,
        session: &SessionContext,
        customer_id: i64,
        account_type: AccountType,
        pin: &str,
        initial_deposit: &str,
    ) -> Result<OpenedAccount, BankError> {
        validate_pin("pin", pin)?;
        let deposit = Amount::parse("initial deposit", initial_deposit)?;

        let customer = self
            .store
            .fetch_customer(customer_id)
            .await?
            .ok_or(BankError::NotFound { entity: "customer" })?;

        let account_no = idgen::account_number(&self.store).await?;
        let routing_code = idgen::routing_code();

        let account = Account {
            account_no: account_no.clone(),
            cust_id: customer.id,
            cust_name: customer.name.clone(),
            account_type,
            pin: pin.to_string(),
            balance: deposit.value(),
            routing_code: routing_code.clone(),
            status: AccountStatus::Active,
        };

        let mut tx = self.store.begin().await?;
        tx.insert_account(&account).await?;
        tx.insert_txn(NewTxn {
            account_no: account_no.clone(),
            cust_name: customer.name,
            txn_type: TxnType::Deposit,
            amount: deposit.value(),
        })
        .await?;
        tx.commit().await?;

        info!(
            operator = %session.operator,
            account_no = %account_no,
            %deposit,
            "account opened"
        );
        Ok(OpenedAccount {
            account_no,
            routing_code,
        })
    }

    /// Credit an account. Authorization chain: exists, active, owner name,
    /// PIN.
    pub async fn deposit(
        &self,
        session: &SessionContext,
        account_no: &str,
        claimed_owner: &str,
        pin: &str,
        amount: &str,
    ) -> Result<(), BankError> {
        self.money_op(session, account_no, claimed_owner, pin, amount, TxnType::Deposit)
            .await
    }

    /// Debit an account. Same chain as deposit, plus the balance check;
    /// withdrawing the exact balance is allowed.
    pub async fn withdraw(
        &self,
        session: &SessionContext,
        account_no: &str,
        claimed_owner: &str,
        pin: &str,
        amount: &str,
    ) -> Result<(), BankError> {
        self.money_op(session, account_no, claimed_owner, pin, amount, TxnType::Withdraw)
            .await
    }

    async fn money_op(
        &self,
        session: &SessionContext,
        account_no: &str,
        claimed_owner: &str,
        pin: &str,
        amount: &str,
        txn_type: TxnType,
    ) -> Result<(), BankError> {
        let amount = Amount::parse("amount", amount)?;

        let mut tx = self.store.begin().await?;
        let account = tx
            .account_for_update(account_no)
            .await?
            .ok_or(BankError::NotFound { entity: "account" })?;

        authorize(&account, claimed_owner, pin)?;

        let new_balance = match txn_type {
            TxnType::Deposit => account.balance + amount.value(),
            TxnType::Withdraw => {
                if account.balance < amount.value() {
                    return Err(BankError::InsufficientFunds);
                }
                account.balance - amount.value()
            }
            _ => unreachable!("money_op only handles Deposit and Withdraw"),
        };

        tx.update_balance(account_no, normalize(new_balance)).await?;
        tx.insert_txn(NewTxn {
            account_no: account_no.to_string(),
            cust_name: account.cust_name,
            txn_type,
            amount: amount.value(),
        })
        .await?;
        tx.commit().await?;

        info!(
            operator = %session.operator,
            account_no,
            txn_type = %txn_type,
            %amount,
            "balance updated"
        );
        Ok(())
    }

    /// Move money between two accounts. The debit and credit legs commit
    /// together or not at all.
    pub async fn transfer(
        &self,
        session: &SessionContext,
        from_account: &str,
        claimed_owner: &str,
        pin: &str,
        to_account: &str,
        amount: &str,
    ) -> Result<(), BankError> {
        if from_account == to_account {
            return Err(BankError::Validation {
                field: "to account",
            });
        }
        let amount = Amount::parse("amount", amount)?;

        let mut tx = self.store.begin().await?;

        // Read both rows in lexicographic order so two opposing transfers
        // cannot deadlock each other.
        let (source, destination) = if from_account < to_account {
            let src = tx.account_for_update(from_account).await?;
            let dst = tx.account_for_update(to_account).await?;
            (src, dst)
        } else {
            let dst = tx.account_for_update(to_account).await?;
            let src = tx.account_for_update(from_account).await?;
            (src, dst)
        };

        let source = source.ok_or(BankError::NotFound {
            entity: "from account",
        })?;
        authorize(&source, claimed_owner, pin)?;
        if source.balance < amount.value() {
            return Err(BankError::InsufficientFunds);
        }

        let destination = destination.ok_or(BankError::NotFound {
            entity: "to account",
        })?;
        if destination.status != AccountStatus::Active {
            return Err(BankError::AccountBlocked);
        }

        tx.update_balance(from_account, normalize(source.balance - amount.value()))
            .await?;
        tx.update_balance(to_account, normalize(destination.balance + amount.value()))
            .await?;
        tx.insert_txn(NewTxn {
            account_no: from_account.to_string(),
            cust_name: source.cust_name,
            txn_type: TxnType::TransferOut,
            amount: amount.value(),
        })
        .await?;
        tx.insert_txn(NewTxn {
            account_no: to_account.to_string(),
            cust_name: destination.cust_name,
            txn_type: TxnType::TransferIn,
            amount: amount.value(),
        })
        .await?;
        tx.commit().await?;

        info!(
            operator = %session.operator,
            from_account,
            to_account,
            %amount,
            "transfer committed"
        );
        Ok(())
    }

    /// Replace an account PIN after verifying the old one.
    pub async fn change_pin(
        &self,
        session: &SessionContext,
        account_no: &str,
        old_pin: &str,
        new_pin: &str,
        confirm_pin: &str,
    ) -> Result<(), BankError> {
        if new_pin != confirm_pin {
            return Err(BankError::Validation {
                field: "confirm pin",
            });
        }
        validate_pin("new pin", new_pin)?;

        let mut tx = self.store.begin().await?;
        let account = tx
            .account_for_update(account_no)
            .await?
            .ok_or(BankError::NotFound { entity: "account" })?;

        if account.status != AccountStatus::Active {
            return Err(BankError::AccountBlocked);
        }
        if account.pin != old_pin {
            return Err(BankError::AuthFailed);
        }

        tx.update_pin(account_no, new_pin).await?;
        tx.commit().await?;

        info!(operator = %session.operator, account_no, "pin changed");
        Ok(())
    }

    /// Block or unblock an account.
    pub async fn set_account_status(
        &self,
        session: &SessionContext,
        account_no: &str,
        status: AccountStatus,
    ) -> Result<(), BankError> {
        let mut tx = self.store.begin().await?;
        let updated = tx.update_status(account_no, status).await?;
        if !updated {
            return Err(BankError::NotFound { entity: "account" });
        }
        tx.commit().await?;

        info!(operator = %session.operator, account_no, status = %status, "status updated");
        Ok(())
    }
}

/// The short-circuiting authorization chain shared by deposit, withdraw and
/// the transfer source: active status, then owner name (trimmed,
/// case-insensitive), then PIN (exact).
fn authorize(account: &Account, claimed_owner: &str, pin: &str) -> Result<(), BankError> {
    if account.status != AccountStatus::Active {
        return Err(BankError::AccountBlocked);
    }
    if !account
        .cust_name
        .trim()
        .eq_ignore_ascii_case(claimed_owner.trim())
    {
        return Err(BankError::OwnerMismatch);
    }
    if account.pin != pin {
        return Err(BankError::AuthFailed);
    }
    Ok(())
}
