use std::path::Path;

use anyhow::{bail, Context};
use colored::{ColoredString, Colorize};
use serde_json::json;
use tl_engine::{AppliedTransaction, ApplyFlags, LineSides, SideState, TransactionEngine, TrustSet};
use tl_store::{
    dir_entries, AccountRoot, InMemoryLedgerStore, LedgerConfig, LedgerSnapshot, ReadView,
};
use tl_types::{AccountId, CurrencyId, Drops, IssuedAmount, LedgerIndex, ResultClass, ResultCode};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args, format),
        Command::Apply(args) => cmd_apply(args, format),
        Command::Line(args) => cmd_line(args, format),
        Command::Account(args) => cmd_account(args, format),
        Command::Reserve(args) => cmd_reserve(args, format),
        Command::Codes => cmd_codes(format),
    }
}

/// Shortest all-hex input read as an id rather than a passphrase label.
const HEX_ID_MIN_LEN: usize = 16;

/// A 40-digit hex id, or a passphrase label.
///
/// Input prefixed with `ac:`, or made of at least [`HEX_ID_MIN_LEN`] hex
/// digits, must decode as an id; it never falls back to a label.
fn parse_account(text: &str) -> anyhow::Result<AccountId> {
    let hex_like = text.starts_with("ac:")
        || (text.len() >= HEX_ID_MIN_LEN && text.bytes().all(|b| b.is_ascii_hexdigit()));
    if hex_like {
        return AccountId::from_hex(text).with_context(|| format!("invalid account id `{text}`"));
    }
    Ok(AccountId::from_passphrase(text))
}

/// `NAME=DROPS`; an empty name funds a fresh random account.
fn parse_funding(text: &str) -> anyhow::Result<(AccountId, Drops)> {
    let (name, drops) = text
        .split_once('=')
        .with_context(|| format!("expected NAME=DROPS, got `{text}`"))?;
    let drops: u64 = drops
        .parse()
        .with_context(|| format!("invalid drops amount in `{text}`"))?;
    let account = if name.is_empty() {
        AccountId::ephemeral()
    } else {
        parse_account(name)?
    };
    Ok((account, Drops(drops)))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LedgerConfig> {
    match path {
        Some(path) => LedgerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(LedgerConfig::default()),
    }
}

fn load_ledger(path: &Path) -> anyhow::Result<InMemoryLedgerStore> {
    let snapshot = LedgerSnapshot::load(path)
        .with_context(|| format!("failed to read ledger {}", path.display()))?;
    let store = InMemoryLedgerStore::from_snapshot(snapshot)?;
    debug!(path = %path.display(), entries = store.len(), "ledger loaded");
    Ok(store)
}

fn save_ledger(store: &InMemoryLedgerStore, path: &Path) -> anyhow::Result<()> {
    let text = store.snapshot()?.to_json_pretty()?;
    std::fs::write(path, text).with_context(|| format!("failed to write ledger {}", path.display()))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn paint(code: ResultCode) -> ColoredString {
    match code.class() {
        ResultClass::Success => code.token().green().bold(),
        ResultClass::Claimed | ResultClass::Retry => code.token().yellow().bold(),
        ResultClass::Malformed | ResultClass::Failure => code.token().red().bold(),
    }
}

fn cmd_init(args: InitArgs, format: OutputFormat) -> anyhow::Result<()> {
    if args.ledger.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.ledger.display());
    }
    let config = load_config(args.config.as_deref())?;
    let store = InMemoryLedgerStore::new(config);
    let mut funded = Vec::with_capacity(args.accounts.len());
    for funding in &args.accounts {
        let (account, balance) = parse_funding(funding)?;
        store.insert(AccountRoot::new(account, balance).into())?;
        funded.push((account, balance));
    }
    save_ledger(&store, &args.ledger)?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "ledger": args.ledger.display().to_string(),
            "accounts": funded
                .iter()
                .map(|(account, balance)| json!({ "account": account, "balance": balance }))
                .collect::<Vec<_>>(),
        })),
        OutputFormat::Text => {
            println!("{} Initialized ledger {}", "✓".green().bold(), args.ledger.display().to_string().bold());
            for (account, balance) in &funded {
                println!("  {} {}", account.to_string().cyan(), balance);
            }
            Ok(())
        }
    }
}

fn cmd_apply(args: ApplyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_ledger(&args.ledger)?;
    let currency = CurrencyId::parse(&args.currency)
        .with_context(|| format!("invalid currency `{}`", args.currency))?;
    let tx = TrustSet {
        account: parse_account(&args.account)?,
        limit_amount: IssuedAmount::new(args.limit, currency, parse_account(&args.destination)?),
        quality_in: args.quality_in,
        quality_out: args.quality_out,
    };
    let flags = if args.closed { ApplyFlags::closed() } else { ApplyFlags::open() };

    let engine = TransactionEngine::new(store);
    let applied = if args.dry_run {
        let outcome = engine.preview(&tx, flags);
        AppliedTransaction {
            result: outcome.result,
            created: outcome.changes.created(),
            modified: outcome.changes.modified(),
            deleted: outcome.changes.deleted(),
        }
    } else {
        let applied = engine.apply(&tx, flags)?;
        if applied.is_success() {
            save_ledger(engine.store(), &args.ledger)?;
        }
        applied
    };

    match format {
        OutputFormat::Json => print_json(&json!({
            "result": applied.result,
            "code": applied.result.code(),
            "retry": applied.result.may_succeed_later(),
            "created": applied.created,
            "modified": applied.modified,
            "deleted": applied.deleted,
            "dry_run": args.dry_run,
        })),
        OutputFormat::Text => {
            println!("{} {}", paint(applied.result), applied.result.description());
            if applied.is_success() {
                println!(
                    "  created {}, modified {}, deleted {}",
                    applied.created, applied.modified, applied.deleted
                );
                if args.dry_run {
                    println!("  {}", "dry run: ledger not written".dimmed());
                }
            } else if applied.result.may_succeed_later() {
                println!("  {}", "may succeed once the ledger changes".dimmed());
            }
            Ok(())
        }
    }
}

fn cmd_line(args: LineArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_ledger(&args.ledger)?;
    let account = parse_account(&args.account)?;
    let destination = parse_account(&args.destination)?;
    let currency = CurrencyId::parse(&args.currency)
        .with_context(|| format!("invalid currency `{}`", args.currency))?;
    let index = LedgerIndex::trust_line(&account, &destination, &currency);

    let Some(line) = store.read_trust_line(&index)? else {
        match format {
            OutputFormat::Json => print_json(&json!({ "index": index, "line": null }))?,
            OutputFormat::Text => println!("No {} line between {} and {}", currency, account, destination),
        }
        return Ok(());
    };

    let sides = LineSides::new(account, destination);
    let mine = SideState::of(&line, sides.requester);
    let theirs = SideState::of(&line, sides.counterparty());

    match format {
        OutputFormat::Json => print_json(&json!({ "index": index, "line": line })),
        OutputFormat::Text => {
            println!("Line {} ({})", index.short_hex().yellow(), currency.to_string().bold());
            for (label, who, state, side) in [
                ("you", account, mine, sides.requester),
                ("peer", destination, theirs, sides.counterparty()),
            ] {
                let reserve = if line.flags.reserve(side) { "reserved".green() } else { "-".dimmed() };
                println!(
                    "  {:<4} {} [{}] limit {} balance {} quality in/out {}/{} {}",
                    label,
                    who.to_string().cyan(),
                    side,
                    state.limit.value,
                    state.balance.value,
                    state.quality_in.raw(),
                    state.quality_out.raw(),
                    reserve
                );
            }
            Ok(())
        }
    }
}

fn cmd_account(args: AccountArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_ledger(&args.ledger)?;
    let account = parse_account(&args.account)?;
    let Some(root) = store.read_account_root(&LedgerIndex::account_root(&account))? else {
        bail!("account {account} not found");
    };
    let owned = dir_entries(&store, &LedgerIndex::owner_dir(&account))?;
    let reserve = store.config().fees.reserve(root.owner_count);

    match format {
        OutputFormat::Json => print_json(&json!({
            "account": root.account,
            "balance": root.balance,
            "owner_count": root.owner_count,
            "reserve": reserve,
            "owned": owned,
        })),
        OutputFormat::Text => {
            println!("Account {} ({})", account.to_string().cyan().bold(), account.to_hex().dimmed());
            println!("  Balance: {}", root.balance);
            println!("  Owner count: {} (reserve {})", root.owner_count, reserve);
            for index in &owned {
                println!("  owns {}", index.short_hex().yellow());
            }
            Ok(())
        }
    }
}

fn cmd_reserve(args: ReserveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let reserve = config.fees.reserve(args.owner_count);
    match format {
        OutputFormat::Json => print_json(&json!({
            "owner_count": args.owner_count,
            "reserve": reserve,
        })),
        OutputFormat::Text => {
            println!("Reserve for {} owned objects: {}", args.owner_count, reserve.to_string().bold());
            Ok(())
        }
    }
}

fn cmd_codes(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!(ResultCode::ALL
            .iter()
            .map(|code| json!({
                "token": code.token(),
                "code": code.code(),
                "class": code.class(),
                "retry": code.may_succeed_later(),
                "description": code.description(),
            }))
            .collect::<Vec<_>>())),
        OutputFormat::Text => {
            for code in ResultCode::ALL {
                println!("{:>5}  {:<26} {}", code.code(), paint(code), code.description());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_args(ledger: &Path, account: &str, destination: &str, limit: i64) -> ApplyArgs {
        ApplyArgs {
            ledger: ledger.to_path_buf(),
            account: account.into(),
            destination: destination.into(),
            currency: "USD".into(),
            limit,
            quality_in: None,
            quality_out: None,
            closed: false,
            dry_run: false,
        }
    }

    fn init(ledger: &Path, accounts: &[&str]) {
        let args = InitArgs {
            ledger: ledger.to_path_buf(),
            accounts: accounts.iter().map(|s| s.to_string()).collect(),
            config: None,
            force: false,
        };
        cmd_init(args, OutputFormat::Json).unwrap();
    }

    fn line_count(ledger: &Path) -> usize {
        load_ledger(ledger)
            .unwrap()
            .snapshot()
            .unwrap()
            .entries
            .iter()
            .filter(|entry| entry.as_trust_line().is_some())
            .count()
    }

    #[test]
    fn account_arguments() {
        let id = AccountId::from_passphrase("alice");
        assert_eq!(parse_account(&id.to_hex()).unwrap(), id);
        assert_eq!(parse_account(&format!("ac:{}", id.to_hex())).unwrap(), id);
        assert_eq!(parse_account("alice").unwrap(), id);
        // Short hex-looking labels are still labels.
        assert_eq!(
            parse_account("cafe").unwrap(),
            AccountId::from_passphrase("cafe")
        );
    }

    #[test]
    fn malformed_hex_account_is_an_error() {
        let hex = AccountId::from_passphrase("alice").to_hex();
        assert!(parse_account(&hex[..39]).is_err());
        assert!(parse_account(&hex[..38]).is_err());
        assert!(parse_account(&format!("ac:{}", &hex[..10])).is_err());
        assert!(parse_account("ac:not-hex").is_err());
    }

    #[test]
    fn empty_funding_name_is_a_fresh_account() {
        let (first, drops) = parse_funding("=500").unwrap();
        let (second, _) = parse_funding("=500").unwrap();
        assert_eq!(drops, Drops(500));
        assert_ne!(first, second);
        assert_ne!(first, AccountId::from_passphrase(""));
    }

    #[test]
    fn funding_arguments() {
        let (account, drops) = parse_funding("bob=1500").unwrap();
        assert_eq!(account, AccountId::from_passphrase("bob"));
        assert_eq!(drops, Drops(1500));
        assert!(parse_funding("bob").is_err());
        assert!(parse_funding("bob=lots").is_err());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        init(&ledger, &["alice=1000"]);
        let again = InitArgs {
            ledger: ledger.clone(),
            accounts: vec![],
            config: None,
            force: false,
        };
        assert!(cmd_init(again, OutputFormat::Text).is_err());
    }

    #[test]
    fn apply_writes_ledger_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        init(&ledger, &["alice=1000000000", "bob=1000000000"]);

        cmd_apply(apply_args(&ledger, "alice", "bob", 100), OutputFormat::Json).unwrap();
        assert_eq!(line_count(&ledger), 1);

        cmd_apply(apply_args(&ledger, "alice", "bob", 0), OutputFormat::Text).unwrap();
        assert_eq!(line_count(&ledger), 0);
    }

    #[test]
    fn dry_run_and_rejections_leave_ledger_alone() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        init(&ledger, &["alice=1", "bob=1000000000"]);
        let before = std::fs::read_to_string(&ledger).unwrap();

        cmd_apply(apply_args(&ledger, "alice", "bob", 100), OutputFormat::Text).unwrap();
        let mut dry = apply_args(&ledger, "bob", "alice", 100);
        dry.dry_run = true;
        cmd_apply(dry, OutputFormat::Json).unwrap();

        assert_eq!(std::fs::read_to_string(&ledger).unwrap(), before);
    }

    #[test]
    fn config_file_drives_reserve() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("ledger.toml");
        std::fs::write(&config, "[fees]\nbase = 10\nincrement = 5\n").unwrap();
        let loaded = load_config(Some(&config)).unwrap();
        assert_eq!(loaded.fees.reserve(2), Drops(20));
        cmd_reserve(
            ReserveArgs {
                owner_count: 2,
                config: Some(config),
            },
            OutputFormat::Text,
        )
        .unwrap();
    }

    #[test]
    fn inspect_commands_run() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        init(&ledger, &["alice=1000000000", "bob=1000000000"]);
        cmd_apply(apply_args(&ledger, "alice", "bob", 25), OutputFormat::Text).unwrap();

        let line = LineArgs {
            ledger: ledger.clone(),
            account: "bob".into(),
            destination: "alice".into(),
            currency: "USD".into(),
        };
        cmd_line(line, OutputFormat::Text).unwrap();
        let account = AccountArgs {
            ledger: ledger.clone(),
            account: "alice".into(),
        };
        cmd_account(account, OutputFormat::Json).unwrap();
        let missing = AccountArgs {
            ledger,
            account: "carol".into(),
        };
        assert!(cmd_account(missing, OutputFormat::Text).is_err());
        cmd_codes(OutputFormat::Text).unwrap();
    }
}
