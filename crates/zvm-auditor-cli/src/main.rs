//! ZVM Auditor - command-line entry point
//!
//! The `zvm-auditor` command reports Zerto Virtual Manager events and tasks
//! that no earlier run has reported. Schedule it (cron, systemd timer) to get
//! a continuous audit trail.
//!
//! ## Commands
//!
//! - `run` (default): authenticate, then run the events and tasks passes
//! - `status`: show how many identifiers each collection has recorded
//! - `seen`: list the recorded identifiers of one collection

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{error, Level};

use zvm_auditor::{run_cycle, AuditorConfig, AuditorError, PassOutcome};
use zvm_client::{parse_bool_flag, ZvmConfig, DEFAULT_ADDRESS, DEFAULT_USERNAME};
use zvm_state::{Collection, SeenStore, StoreConfig, SurrealSeenStore, DEFAULT_STORE_PATH};

#[derive(Parser)]
#[command(name = "zvm-auditor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report new Zerto Virtual Manager events and tasks", long_about = None)]
struct Cli {
    /// Enable verbose (debug) output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Seen-store directory
    #[arg(long, env = "ZVM_AUDITOR_DB", default_value = DEFAULT_STORE_PATH, global = true)]
    db: PathBuf,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConnectionArgs {
    /// ZVM host or IP address
    #[arg(long, env = "ZVM_ADDRESS", default_value = DEFAULT_ADDRESS, global = true)]
    address: String,

    /// ZVM (Keycloak) username
    #[arg(long, env = "ZVM_USERNAME", default_value = DEFAULT_USERNAME, global = true)]
    username: String,

    /// ZVM (Keycloak) password
    #[arg(long, env = "ZVM_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Verify the ZVM's TLS certificate (true/1/t to enable)
    #[arg(
        long,
        env = "VERIFY_CERTIFICATE",
        default_value = "false",
        value_parser = parse_verify_flag,
        action = ArgAction::Set,
        global = true
    )]
    verify_certificate: bool,
}

impl ConnectionArgs {
    fn to_config(&self) -> Result<ZvmConfig> {
        let password = self
            .password
            .clone()
            .context("ZVM_PASSWORD not set (use --password or the environment)")?;

        Ok(ZvmConfig::new(&self.address, &self.username, password)
            .with_verify_certificate(self.verify_certificate))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Poll events and tasks once and report records not seen before
    Run,

    /// Show how many identifiers are recorded per collection
    Status,

    /// List recorded identifiers of a collection
    Seen {
        /// Collection to list (events or tasks)
        collection: Collection,
    },
}

fn parse_verify_flag(value: &str) -> std::result::Result<bool, String> {
    Ok(parse_bool_flag(value))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    zvm_auditor::init_tracing(cli.json, level);

    let store_config = StoreConfig::new(&cli.db);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = AuditorConfig::new(cli.connection.to_config()?, store_config);
            cmd_run(&config, cli.json).await
        }
        Commands::Status => {
            let store = open_store(&store_config).await?;
            cmd_status(&store, cli.json).await
        }
        Commands::Seen { collection } => {
            let store = open_store(&store_config).await?;
            cmd_seen(&store, collection).await
        }
    }
}

async fn open_store(config: &StoreConfig) -> Result<SurrealSeenStore> {
    SurrealSeenStore::open(config)
        .await
        .with_context(|| format!("Failed to open seen store at {:?}", config.path))
}

/// Run one audit cycle
async fn cmd_run(config: &AuditorConfig, json: bool) -> Result<()> {
    let client = config.client().context("Failed to create ZVM client")?;
    // Opened once per run; released when the cycle returns
    let store = config
        .open_store()
        .await
        .with_context(|| format!("Failed to open seen store at {:?}", config.store.path))?;

    let report = match run_cycle(&client, &store).await {
        Ok(report) => report,
        Err(AuditorError::Auth(_)) => {
            // Already logged with its cause; the run ends normally.
            error!("Failed to get token.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Audit cycle failed"),
    };

    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    for pass in &report.passes {
        match pass {
            PassOutcome::Completed(r) => println!(
                "{:<7} {} new, {} already seen, {} without identifier",
                r.collection,
                r.new_identifiers.len(),
                r.skipped,
                r.missing_identifier
            ),
            PassOutcome::Failed { collection, error } => {
                println!("{:<7} failed: {}", collection, error)
            }
        }
    }

    Ok(())
}

/// Show recorded identifier counts
async fn cmd_status(store: &dyn SeenStore, json: bool) -> Result<()> {
    let mut counts = serde_json::Map::new();
    for collection in Collection::ALL {
        let count = store
            .count(collection)
            .await
            .with_context(|| format!("Failed to count {}", collection))?;
        counts.insert(collection.to_string(), count.into());
    }

    if json {
        println!("{}", serde_json::Value::Object(counts));
    } else {
        for (collection, count) in &counts {
            println!("{:<7} {} seen", collection, count);
        }
    }

    Ok(())
}

/// List recorded identifiers
async fn cmd_seen(store: &dyn SeenStore, collection: Collection) -> Result<()> {
    let identifiers = store
        .list(collection)
        .await
        .with_context(|| format!("Failed to list {}", collection))?;

    if identifiers.is_empty() {
        println!("No {} recorded yet", collection);
        return Ok(());
    }

    for identifier in identifiers {
        println!("{}", identifier);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use zvm_state::fakes::MemorySeenStore;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["zvm-auditor"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_seen_parses_collection() {
        let cli = Cli::try_parse_from(["zvm-auditor", "seen", "tasks"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Seen {
                collection: Collection::Tasks
            })
        ));

        assert!(Cli::try_parse_from(["zvm-auditor", "seen", "vpgs"]).is_err());
    }

    #[test]
    fn test_connection_flags() {
        let cli = Cli::try_parse_from([
            "zvm-auditor",
            "--address",
            "10.1.2.3",
            "--password",
            "secret",
            "--verify-certificate",
            "T",
            "run",
        ])
        .unwrap();

        let config = cli.connection.to_config().unwrap();
        assert_eq!(config.address, "10.1.2.3");
        assert!(config.verify_certificate);
        assert_eq!(config.client_id, "zerto-client");
    }

    #[test]
    fn test_connection_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "zvm-auditor",
            "run",
            "--password",
            "x",
            "--address",
            "zvm.lab",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Run)));

        let config = cli.connection.to_config().unwrap();
        assert_eq!(config.password, "x");
        assert_eq!(config.address, "zvm.lab");
    }

    #[test]
    fn test_env_wiring_and_defaults() {
        let command = Cli::command();
        let arg = |id: &str| {
            command
                .get_arguments()
                .find(|a| a.get_id() == id)
                .unwrap()
                .clone()
        };

        let expected = [
            ("address", "ZVM_ADDRESS", Some(DEFAULT_ADDRESS)),
            ("username", "ZVM_USERNAME", Some(DEFAULT_USERNAME)),
            ("password", "ZVM_PASSWORD", None),
            ("verify_certificate", "VERIFY_CERTIFICATE", Some("false")),
            ("db", "ZVM_AUDITOR_DB", Some(DEFAULT_STORE_PATH)),
        ];
        for (id, env, default) in expected {
            let a = arg(id);
            assert_eq!(a.get_env().and_then(|e| e.to_str()), Some(env), "{id}");
            let defaults: Vec<_> = a
                .get_default_values()
                .iter()
                .filter_map(|v| v.to_str())
                .collect();
            assert_eq!(defaults.first().copied(), default, "{id}");
        }
    }

    #[test]
    fn test_missing_password_is_an_error() {
        let connection = ConnectionArgs {
            address: DEFAULT_ADDRESS.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            verify_certificate: false,
        };

        let err = connection.to_config().unwrap_err();
        assert!(err.to_string().contains("ZVM_PASSWORD"));
    }

    #[test]
    fn test_parse_verify_flag() {
        assert!(parse_verify_flag("1").unwrap());
        assert!(!parse_verify_flag("no").unwrap());
    }

    #[tokio::test]
    async fn test_status_and_seen_against_memory_store() {
        let store = MemorySeenStore::with_seen(Collection::Events, ["E1", "E2"]);
        cmd_status(&store, false).await.unwrap();
        cmd_status(&store, true).await.unwrap();
        cmd_seen(&store, Collection::Events).await.unwrap();
        cmd_seen(&store, Collection::Tasks).await.unwrap();
    }
}
