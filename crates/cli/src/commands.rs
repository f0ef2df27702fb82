//! CLI commands

use crate::context::AppContext;
use unitybank_core::{AccountStatus, AccountType, SessionContext, StatementSummary};
use unitybank_engine::CustomerRegistration;
use unitybank_notify::Notifier;

/// Register a customer (KYC).
pub async fn add_customer(
    ctx: &AppContext,
    session: &SessionContext,
    reg: CustomerRegistration,
) -> Result<(), anyhow::Error> {
    let id = ctx.ops.register_customer(session, reg).await?;
    println!("✅ Customer added (id: {})", id);
    Ok(())
}

/// Open an account with an initial deposit.
pub async fn open_account(
    ctx: &AppContext,
    session: &SessionContext,
    customer_id: i64,
    account_type: &str,
    pin: &str,
    deposit: &str,
) -> Result<(), anyhow::Error> {
    let account_type: AccountType = account_type
        .parse()
        .map_err(|_| anyhow::anyhow!("account type must be Savings or Current"))?;

    let opened = ctx
        .ops
        .open_account(session, customer_id, account_type, pin, deposit)
        .await?;

    println!("✅ Account created");
    println!("   Account No: {}", opened.account_no);
    println!("   Routing:    {}", opened.routing_code);
    Ok(())
}

pub async fn deposit(
    ctx: &AppContext,
    session: &SessionContext,
    account: &str,
    owner: &str,
    pin: &str,
    amount: &str,
) -> Result<(), anyhow::Error> {
    ctx.ops.deposit(session, account, owner, pin, amount).await?;
    println!("✅ Deposit successful");
    Ok(())
}

pub async fn withdraw(
    ctx: &AppContext,
    session: &SessionContext,
    account: &str,
    owner: &str,
    pin: &str,
    amount: &str,
) -> Result<(), anyhow::Error> {
    ctx.ops.withdraw(session, account, owner, pin, amount).await?;
    println!("✅ Withdrawal successful");
    Ok(())
}

pub async fn transfer(
    ctx: &AppContext,
    session: &SessionContext,
    from: &str,
    owner: &str,
    pin: &str,
    to: &str,
    amount: &str,
) -> Result<(), anyhow::Error> {
    ctx.ops.transfer(session, from, owner, pin, to, amount).await?;
    println!("✅ Transferred {} to {}", amount, to);
    Ok(())
}

pub async fn change_pin(
    ctx: &AppContext,
    session: &SessionContext,
    account: &str,
    old_pin: &str,
    new_pin: &str,
    confirm_pin: &str,
) -> Result<(), anyhow::Error> {
    ctx.ops
        .change_pin(session, account, old_pin, new_pin, confirm_pin)
        .await?;
    println!("✅ PIN changed");
    Ok(())
}

pub async fn set_status(
    ctx: &AppContext,
    session: &SessionContext,
    account: &str,
    status: &str,
) -> Result<(), anyhow::Error> {
    let status: AccountStatus = status
        .parse()
        .map_err(|_| anyhow::anyhow!("status must be Active or Blocked"))?;

    ctx.ops.set_account_status(session, account, status).await?;
    println!("✅ Account status set to {}", status);
    Ok(())
}

pub async fn balance(ctx: &AppContext, account: &str, pin: &str) -> Result<(), anyhow::Error> {
    let balance = ctx.queries.balance(account, pin).await?;
    println!("Balance for {}: {}", account, balance);
    Ok(())
}

/// Print transaction history: one account's full history, or the newest
/// rows globally.
pub async fn transactions(
    ctx: &AppContext,
    account: Option<&str>,
    limit: Option<u32>,
) -> Result<(), anyhow::Error> {
    let txns = ctx.queries.list_transactions(account, limit).await?;
    if txns.is_empty() {
        println!("No transactions found");
        return Ok(());
    }

    println!(
        "{:>6}  {:<10}  {:<20}  {:<12}  {:>12}  {}",
        "Txn", "Account", "Name", "Type", "Amount", "Date"
    );
    for t in txns {
        println!(
            "{:>6}  {:<10}  {:<20}  {:<12}  {:>12}  {}",
            t.txn_id,
            t.account_no,
            t.cust_name,
            t.txn_type.to_string(),
            t.amount,
            t.txn_date.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

/// Print every customer with their accounts (if any).
pub async fn customers(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let rows = ctx.queries.list_customer_accounts().await?;
    if rows.is_empty() {
        println!("No records found");
        return Ok(());
    }

    println!(
        "{:>6}  {:<20}  {:<12}  {:<10}  {:<8}  {:>12}  {}",
        "Cust", "Name", "Mobile", "Account", "Type", "Balance", "Status"
    );
    for r in rows {
        println!(
            "{:>6}  {:<20}  {:<12}  {:<10}  {:<8}  {:>12}  {}",
            r.cust_id,
            r.name,
            r.mobile,
            r.account_no.as_deref().unwrap_or("-"),
            r.account_type.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
            r.balance.map(|b| b.to_string()).unwrap_or_else(|| "-".into()),
            r.status.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    Ok(())
}

/// Send an account statement through the notification channel.
///
/// The summary data comes from a committed read; a delivery failure is
/// reported on its own and never turns into an operation failure.
pub async fn send_summary(ctx: &AppContext, account: &str) -> Result<(), anyhow::Error> {
    let summary = ctx.queries.statement_summary(account).await?;
    let text = format_statement(&summary);

    match ctx.notifier.send(&summary.mobile, &text).await {
        Ok(()) => println!("✅ Summary sent to {}", summary.mobile),
        Err(e) => println!("⚠️  Summary not delivered: {}", e),
    }
    Ok(())
}

fn format_statement(summary: &StatementSummary) -> String {
    let mut lines = vec![
        "Bank Summary".to_string(),
        format!("Account: {}", summary.account_no),
        format!("Name: {}", summary.cust_name),
        format!("Balance: {}", summary.balance),
        "Recent transactions:".to_string(),
    ];
    for t in &summary.recent {
        lines.push(format!(
            "- {}: {} on {}",
            t.txn_type,
            t.amount,
            t.txn_date.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use unitybank_core::{TxnRecord, TxnType};

    #[test]
    fn statement_text_lists_recent_transactions() {
        let summary = StatementSummary {
            account_no: "BNK12345".to_string(),
            cust_name: "Asha Rao".to_string(),
            mobile: "9876543210".to_string(),
            balance: Decimal::from_str("128.00").unwrap(),
            recent: vec![TxnRecord {
                txn_id: 7,
                account_no: "BNK12345".to_string(),
                cust_name: "Asha Rao".to_string(),
                txn_type: TxnType::Deposit,
                amount: Decimal::from_str("7.00").unwrap(),
                txn_date: Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
            }],
        };

        let text = format_statement(&summary);
        assert!(text.starts_with("Bank Summary"));
        assert!(text.contains("Account: BNK12345"));
        assert!(text.contains("Balance: 128.00"));
        assert!(text.contains("- Deposit: 7.00 on 2024-05-01 10:30:00"));
    }
}
