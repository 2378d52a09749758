//! competition-datafix - Application Entry Point
//!
//! Command-line front end for the competition database maintenance
//! procedures.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use competition_datafix::{
    AppResult, Config,
    config::DatabaseConfig,
    constants::{DEFAULT_INSPECT_LIMIT, test_account},
    db::{self, MySqlStore},
    models::StudentFixture,
    services::{
        AccountDetails, CredentialService, FixtureService, InspectService, RepairOptions,
        RepairService, SchemaService,
    },
};

#[derive(Parser)]
#[command(name = "datafix")]
#[command(about = "Repairs JSON list columns of the competition database")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print the result as JSON on stdout
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the connection settings read from the environment
#[derive(Args)]
struct DatabaseArgs {
    /// Full connection URL, e.g. mysql://root@localhost:3305/competition_system
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    db_password: Option<String>,
    #[arg(long)]
    database: Option<String>,
}

impl DatabaseArgs {
    fn apply(self, config: &mut DatabaseConfig) {
        if let Some(url) = self.database_url {
            config.url = Some(url);
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(user) = self.user {
            config.user = user;
        }
        if let Some(password) = self.db_password {
            config.password = password;
        }
        if let Some(name) = self.database {
            config.name = name;
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Report which list values are not valid JSON (read-only)
    Inspect {
        /// Rows per table; 0 inspects every row
        #[arg(long, default_value_t = DEFAULT_INSPECT_LIMIT)]
        limit: u32,
    },
    /// Convert comma text and NULLs to JSON arrays
    Repair {
        /// Relax the columns to TEXT during the pass and restore JSON after
        #[arg(long)]
        flip_schema: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Set a known password on an account and verify the login lookup
    ResetPassword {
        #[arg(long, default_value = test_account::EMAIL)]
        email: String,
        #[arg(long, default_value = test_account::PASSWORD)]
        password: String,
        #[arg(long, default_value = test_account::USERNAME)]
        username: String,
        #[arg(long, default_value = test_account::SCHOOL)]
        school: String,
        #[arg(long, default_value = test_account::STUDENT_ID)]
        student_id: String,
        #[arg(long, default_value = test_account::PHONE)]
        phone: String,
    },
    /// Count rows of the competition tables
    Stats,
    /// Add created_at/updated_at to contest_registrations if missing
    EnsureTimestamps {
        #[arg(long)]
        dry_run: bool,
    },
    /// Write skills/achievements from a JSON fixture file
    Apply {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.database.apply(&mut config.database);

    init_tracing(&config.logging.rust_log, cli.log_format);

    if let Err(err) = run(cli.command, &config, cli.json).await {
        tracing::error!(code = err.error_code(), "{}", err);
        std::process::exit(err.exit_code());
    }

    Ok(())
}

fn init_tracing(default_filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into()),
    );

    // Logs go to stderr so --json output on stdout stays parseable
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Connect, run one command, and always close the connection
async fn run(command: Command, config: &Config, json: bool) -> AppResult<()> {
    // Fixture files are read before touching the database
    let fixtures = match &command {
        Command::Apply { file, .. } => Some(FixtureService::load(file).await?),
        _ => None,
    };

    tracing::info!("Connecting to {}", config.database.redacted_target());
    let mut conn = db::connect(&config.database).await?;
    db::test_connection(&mut conn).await?;
    tracing::info!("Connected");

    let mut store = MySqlStore::new(conn);
    let outcome = execute(&mut store, command, fixtures, json).await;

    if let Err(e) = store.close().await {
        tracing::warn!("Failed to close connection: {}", e);
    }
    tracing::info!("Connection closed");

    outcome
}

async fn execute(
    store: &mut MySqlStore,
    command: Command,
    fixtures: Option<Vec<StudentFixture>>,
    json: bool,
) -> AppResult<()> {
    match command {
        Command::Inspect { limit } => {
            let limit = (limit > 0).then_some(limit);
            let report = InspectService::inspect(store, limit).await?;
            let summary = format!(
                "students: {} rows, {} invalid fields",
                report.students.rows_scanned, report.students.invalid_fields
            );
            emit(json, &report, summary)
        }
        Command::Repair {
            flip_schema,
            dry_run,
        } => {
            let options = RepairOptions {
                flip_schema,
                dry_run,
            };
            let report = RepairService::run(store, options).await?;
            let summary = format!(
                "{} rows {}",
                report.rows_updated(),
                if dry_run { "would be updated" } else { "updated" }
            );
            emit(json, &report, summary)
        }
        Command::ResetPassword {
            email,
            password,
            username,
            school,
            student_id,
            phone,
        } => {
            let account = AccountDetails {
                email,
                username,
                school,
                student_id,
                phone,
            };
            let check = CredentialService::reset_password(store, account, &password).await?;
            let summary = format!(
                "{} user #{} <{}>, login lookup verified",
                if check.created { "Created" } else { "Updated" },
                check.user_id,
                check.email
            );
            emit(json, &check, summary)
        }
        Command::Stats => {
            let counts = SchemaService::table_stats(store).await?;
            let summary = counts
                .iter()
                .map(|c| match c.rows {
                    Some(rows) => format!("{}: {}", c.table, rows),
                    None => format!("{}: missing", c.table),
                })
                .collect::<Vec<_>>()
                .join("\n");
            emit(json, &counts, summary)
        }
        Command::EnsureTimestamps { dry_run } => {
            let outcome = SchemaService::ensure_registration_timestamps(store, dry_run).await?;
            emit(json, &outcome, format!("{:?}", outcome))
        }
        Command::Apply { dry_run, .. } => {
            let fixtures = fixtures.unwrap_or_default();
            let report = FixtureService::apply(store, &fixtures, dry_run).await?;
            let summary = format!(
                "{} applied, {} missing {:?}",
                report.applied.len(),
                report.missing.len(),
                report.missing
            );
            emit(json, &report, summary)
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, summary: String) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
