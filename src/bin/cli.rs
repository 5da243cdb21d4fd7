use custody_ledger::{Amount, Custody, Identity,
    backend::JsonStore,
    transfer::PayoutOutbox};

use std::path::{Path, PathBuf};
use anyhow::Context;
use colored::Colorize;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
   /// Path to ledger file to operate on
   #[clap(value_parser)]
    path: PathBuf,

   /// Action to perform
   #[clap(subcommand)]
   action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Create a new ledger owned by the given identity
    Init(Init),
    /// Show the owner identity
    Owner,
    /// Show the held balance
    Balance,
    /// List all applied deposits and withdrawals
    History,
    /// Deposit value into custody
    Deposit(Deposit),
    /// Withdraw value from custody (owner only)
    Withdraw(Withdraw)
}

#[derive(Args, Debug)]
struct Init {
    /// Identity allowed to withdraw
    #[clap(short='o', long, value_parser)]
    owner: Identity
}

#[derive(Args, Debug)]
struct Deposit {
    /// Identity making the deposit
    #[clap(short='f', long, value_parser)]
    from: Identity,

    /// Amount in whole coins, e.g. 1.5
    #[clap(short='a', long, value_parser = Amount::parse_ether)]
    amount: Amount
}

#[derive(Args, Debug)]
struct Withdraw {
    /// Identity requesting the withdrawal
    #[clap(short='c', long, value_parser)]
    caller: Identity,

    /// Identity receiving the funds
    #[clap(short='t', long, value_parser)]
    to: Identity,

    /// Amount in whole coins, e.g. 1.5
    #[clap(short='a', long, value_parser = Amount::parse_ether)]
    amount: Amount,

    /// Payout outbox; defaults to <ledger>.payouts.jsonl
    #[clap(long, value_parser)]
    outbox: Option<PathBuf>
}

fn default_outbox(ledger: &Path) -> PathBuf {
    let mut name = ledger.file_name().unwrap_or_default().to_owned();
    name.push(".payouts.jsonl");
    ledger.with_file_name(name)
}

fn print_balance(balance: Amount) {
    let fmt_balance = if balance.is_zero() {
        balance.format_ether().normal()
    } else {
        balance.format_ether().green()
    };
    println!("{}: {}", "Balance".bold(), fmt_balance);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let store = JsonStore::new(&args.path);
    let outbox_path = match &args.action {
        Subcommands::Withdraw(Withdraw { outbox: Some(path), .. }) => path.clone(),
        _ => default_outbox(&args.path)
    };
    let outbox = PayoutOutbox::new(outbox_path);

    let action = match args.action {
        Subcommands::Init(init) => {
            Custody::initialize(&init.owner, store, outbox)
                .with_context(|| format!("cannot initialize {}", args.path.display()))?;
            println!("Initialized {} owned by {}", args.path.display(), init.owner);
            return Ok(());
        },
        action => action
    };

    let mut custody = Custody::open(store, outbox)
        .with_context(|| format!("cannot open {}", args.path.display()))?;

    match action {
        Subcommands::Init(_) => {},
        Subcommands::Owner => {
            println!("{}: {}", "Owner".bold(), custody.owner());
        },
        Subcommands::Balance => {
            print_balance(custody.balance_of());
        },
        Subcommands::History => {
            for entry in custody.history() {
                println!("{}", entry);
            }
        },
        Subcommands::Deposit(deposit) => {
            let balance = custody.deposit(&deposit.from, deposit.amount)?;
            print_balance(balance);
        },
        Subcommands::Withdraw(withdraw) => {
            let (payout, balance) = custody.withdraw(&withdraw.caller, &withdraw.to, withdraw.amount)
                .map_err(|err| anyhow::anyhow!("{}", err.to_string().bright_red()))?;
            println!("Paid {} to {}", payout.amount.format_ether(), payout.recipient);
            print_balance(balance);
        }
    }
    Ok(())
}
