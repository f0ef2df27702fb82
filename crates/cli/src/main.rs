//! Unity Bank CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use unitybank_cli::{commands, AppContext};
use unitybank_core::{BankError, SessionContext};
use unitybank_engine::CustomerRegistration;

#[derive(Parser)]
#[command(name = "unitybank", version, about = "Unity Bank branch operations")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, default_value = "./data/unitybank.db")]
    db: PathBuf,

    /// Name of the operator performing the action
    #[arg(long, default_value = "counter")]
    operator: String,

    /// Run as a customer session instead of a teller session
    #[arg(long)]
    as_customer: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new customer
    AddCustomer {
        #[arg(long)]
        name: String,
        #[arg(long)]
        gender: String,
        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: String,
        /// 10-digit mobile number
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        password: String,
    },
    /// Open an account for an existing customer
    OpenAccount {
        #[arg(long)]
        customer_id: i64,
        /// Savings or Current
        #[arg(long)]
        account_type: String,
        #[arg(long)]
        pin: String,
        /// Initial deposit amount
        #[arg(long)]
        deposit: String,
    },
    /// Deposit into an account
    Deposit {
        #[arg(long)]
        account: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        pin: String,
        #[arg(long)]
        amount: String,
    },
    /// Withdraw from an account
    Withdraw {
        #[arg(long)]
        account: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        pin: String,
        #[arg(long)]
        amount: String,
    },
    /// Transfer between two accounts
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        pin: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
    /// Change an account PIN
    ChangePin {
        #[arg(long)]
        account: String,
        #[arg(long)]
        old_pin: String,
        #[arg(long)]
        new_pin: String,
        #[arg(long)]
        confirm_pin: String,
    },
    /// Block or unblock an account
    SetStatus {
        #[arg(long)]
        account: String,
        /// Active or Blocked
        #[arg(long)]
        status: String,
    },
    /// Show an account balance
    Balance {
        #[arg(long)]
        account: String,
        #[arg(long)]
        pin: String,
    },
    /// List transactions (one account, or the newest rows globally)
    Transactions {
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List all customers with their accounts
    Customers,
    /// Send an account statement to the holder's mobile
    SendSummary {
        #[arg(long)]
        account: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli.db).await?;
    let session = if cli.as_customer {
        SessionContext::customer(&cli.operator)
    } else {
        SessionContext::teller(&cli.operator)
    };

    let outcome = match cli.command {
        Commands::AddCustomer {
            name,
            gender,
            dob,
            mobile,
            email,
            address,
            password,
        } => {
            let reg = CustomerRegistration {
                name,
                gender,
                dob,
                mobile,
                email,
                address,
                password,
            };
            commands::add_customer(&ctx, &session, reg).await
        }
        Commands::OpenAccount {
            customer_id,
            account_type,
            pin,
            deposit,
        } => {
            commands::open_account(&ctx, &session, customer_id, &account_type, &pin, &deposit)
                .await
        }
        Commands::Deposit {
            account,
            owner,
            pin,
            amount,
        } => commands::deposit(&ctx, &session, &account, &owner, &pin, &amount).await,
        Commands::Withdraw {
            account,
            owner,
            pin,
            amount,
        } => commands::withdraw(&ctx, &session, &account, &owner, &pin, &amount).await,
        Commands::Transfer {
            from,
            owner,
            pin,
            to,
            amount,
        } => commands::transfer(&ctx, &session, &from, &owner, &pin, &to, &amount).await,
        Commands::ChangePin {
            account,
            old_pin,
            new_pin,
            confirm_pin,
        } => commands::change_pin(&ctx, &session, &account, &old_pin, &new_pin, &confirm_pin).await,
        Commands::SetStatus { account, status } => {
            commands::set_status(&ctx, &session, &account, &status).await
        }
        Commands::Balance { account, pin } => commands::balance(&ctx, &account, &pin).await,
        Commands::Transactions { account, limit } => {
            commands::transactions(&ctx, account.as_deref(), limit).await
        }
        Commands::Customers => commands::customers(&ctx).await,
        Commands::SendSummary { account } => commands::send_summary(&ctx, &account).await,
    };

    if let Err(e) = outcome {
        tracing::warn!(operator = %session.operator, error = %e, "operation rejected");
        eprintln!("❌ {}", e);
        if e.downcast_ref::<BankError>().is_some_and(BankError::is_retryable) {
            eprintln!("   transient store failure; retry the command");
        }
        std::process::exit(1);
    }
    Ok(())
}
