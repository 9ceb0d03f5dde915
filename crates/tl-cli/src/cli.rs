use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tl",
    about = "Trustline ledger: apply and inspect trust-line transactions",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a ledger snapshot with funded accounts
    Init(InitArgs),
    /// Apply a TrustSet to a ledger snapshot
    Apply(ApplyArgs),
    /// Show the trust line between two accounts
    Line(LineArgs),
    /// Show an account root and its owner directory
    Account(AccountArgs),
    /// Compute the reserve for an owner count
    Reserve(ReserveArgs),
    /// List result codes
    Codes,
}

#[derive(Args)]
pub struct InitArgs {
    /// Snapshot file to write
    pub ledger: PathBuf,
    /// Account to fund, as NAME=DROPS (repeatable; an empty NAME funds a random account)
    #[arg(long = "account", value_name = "NAME=DROPS")]
    pub accounts: Vec<String>,
    /// Ledger configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Ledger snapshot (JSON)
    #[arg(long)]
    pub ledger: PathBuf,
    /// Requesting account (hex id or passphrase label)
    #[arg(long)]
    pub account: String,
    /// Counterparty account (hex id or passphrase label)
    #[arg(long)]
    pub destination: String,
    /// Currency code or 40-digit hex
    #[arg(long)]
    pub currency: String,
    /// New limit on the requester's side
    #[arg(long, allow_hyphen_values = true)]
    pub limit: i64,
    #[arg(long)]
    pub quality_in: Option<u32>,
    #[arg(long)]
    pub quality_out: Option<u32>,
    /// Apply as a closed (final) ledger: reserves are not enforced
    #[arg(long)]
    pub closed: bool,
    /// Evaluate only; leave the snapshot untouched
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct LineArgs {
    #[arg(long)]
    pub ledger: PathBuf,
    pub account: String,
    pub destination: String,
    #[arg(long, default_value = "USD")]
    pub currency: String,
}

#[derive(Args)]
pub struct AccountArgs {
    #[arg(long)]
    pub ledger: PathBuf,
    pub account: String,
}

#[derive(Args)]
pub struct ReserveArgs {
    /// Number of owned objects
    pub owner_count: u32,
    /// Ledger configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from([
            "tl", "init", "ledger.json", "--account", "alice=500", "--account", "bob=10",
        ])
        .unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.ledger, PathBuf::from("ledger.json"));
            assert_eq!(args.accounts, vec!["alice=500", "bob=10"]);
            assert!(!args.force);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_apply() {
        let cli = Cli::try_parse_from([
            "tl", "apply", "--ledger", "l.json", "--account", "alice", "--destination", "bob",
            "--currency", "USD", "--limit", "100", "--quality-in", "900000000", "--closed",
        ])
        .unwrap();
        if let Command::Apply(args) = cli.command {
            assert_eq!(args.account, "alice");
            assert_eq!(args.destination, "bob");
            assert_eq!(args.limit, 100);
            assert_eq!(args.quality_in, Some(900_000_000));
            assert_eq!(args.quality_out, None);
            assert!(args.closed);
            assert!(!args.dry_run);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_negative_limit() {
        let cli = Cli::try_parse_from([
            "tl", "apply", "--ledger", "l.json", "--account", "a", "--destination", "b",
            "--currency", "USD", "--limit", "-5",
        ])
        .unwrap();
        if let Command::Apply(args) = cli.command {
            assert_eq!(args.limit, -5);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_line_default_currency() {
        let cli = Cli::try_parse_from(["tl", "line", "--ledger", "l.json", "alice", "bob"]).unwrap();
        if let Command::Line(args) = cli.command {
            assert_eq!(args.currency, "USD");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_reserve() {
        let cli = Cli::try_parse_from(["tl", "reserve", "3"]).unwrap();
        if let Command::Reserve(args) = cli.command {
            assert_eq!(args.owner_count, 3);
            assert!(args.config.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verbose_and_json() {
        let cli = Cli::try_parse_from(["tl", "--verbose", "--format", "json", "codes"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Codes));
    }
}
