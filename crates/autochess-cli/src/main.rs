//! autochess - command line front end for the autochess client session.
//!
//! Bootstraps the application context (config, HTTP client, token storage,
//! auth store) and runs a single login/logout/status command against it.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use autochess_core::auth::StorageBackend;
use autochess_core::{App, AuthStatus, Config, Credentials, TokenStorage};

/// Environment variable consulted for the password before prompting
const ENV_PASSWORD: &str = "AUTOCHESS_PASSWORD";

#[derive(Parser)]
#[command(name = "autochess", version, about = "Sign in to an autochess server")]
struct Cli {
    /// Backend base URL (overrides config and AUTOCHESS_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Keep the token in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        email: Option<String>,
        /// Password (falls back to AUTOCHESS_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session is active
    Status,
    /// Print the stored session token
    Token,
}

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
fn init_tracing(log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_ref())?;
    info!("autochess starting");

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if cli.ephemeral {
        config.storage = StorageBackend::Memory;
    }

    let app = App::bootstrap(config).context("Failed to start")?;

    match cli.command {
        Commands::Login { email, password } => login(&app, email, password).await?,
        Commands::Logout => {
            app.auth.log_out();
            println!("Logged out.");
        }
        Commands::Status => print_status(&app),
        Commands::Token => match app.auth.token() {
            Some(token) => println!("{}", token),
            None => anyhow::bail!("Not logged in"),
        },
    }

    Ok(())
}

async fn login(app: &App, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = match email.or_else(|| app.config.last_email.clone()) {
        Some(email) => email,
        None => prompt_email()?,
    };
    let password = match password.or_else(|| std::env::var(ENV_PASSWORD).ok()) {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };

    let credentials = Credentials::new(email.trim(), password);
    if !credentials.is_complete() {
        anyhow::bail!("Email and password required");
    }

    println!("Logging in to {} as {}...", app.api.base_url(), credentials.email);

    match app.auth.check_credentials(credentials.clone()).await {
        Ok(_) => {
            remember_email(&credentials.email);
            println!("Login successful.");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

fn print_status(app: &App) {
    let status = app.auth.status();
    println!("Server: {}", app.api.base_url());
    println!("Status: {}", status.display_name());
    if status == AuthStatus::Authenticated {
        if let Some(email) = &app.config.last_email {
            println!("Email:  {}", email);
        }
        match app.storage.stored_at() {
            Ok(Some(at)) => println!("Since:  {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read token timestamp"),
        }
    }
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

/// Store the email for the next login. Only the file config is touched so
/// command line and environment overrides are not persisted.
fn remember_email(email: &str) {
    let result = Config::config_path().and_then(|path| {
        let mut stored = Config::load_from(&path)?;
        stored.last_email = Some(email.to_string());
        stored.save()
    });
    if let Err(e) = result {
        warn!(error = %e, "Failed to save config");
    }
}
