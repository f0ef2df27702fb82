//! Application context - wires everything together

use std::path::Path;
use unitybank_engine::{AccountOps, LedgerQueries};
use unitybank_notify::LogNotifier;
use unitybank_store::SqliteLedger;

/// Application context: the store, the engine over it, the read facade and
/// the notification channel.
pub struct AppContext {
    pub ops: AccountOps<SqliteLedger>,
    pub queries: LedgerQueries<SqliteLedger>,
    pub notifier: LogNotifier,
}

impl AppContext {
    /// Open the database (creating parents and schema as needed) and wire
    /// up the components.
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let ledger = SqliteLedger::open(db_path).await?;

        Ok(Self {
            ops: AccountOps::new(ledger.clone()),
            queries: LedgerQueries::new(ledger),
            notifier: LogNotifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_creates_database_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bank.db");

        let ctx = AppContext::new(&path).await.unwrap();
        assert!(path.exists());

        // A fresh database has no transactions.
        let txns = ctx.queries.list_transactions(None, None).await.unwrap();
        assert!(txns.is_empty());
    }
}
