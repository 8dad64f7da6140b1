//! Autorun CLI - manage launch-at-login registration from the command line
//!
//! This binary can:
//! - Check whether an application is registered to start at login
//! - Register or unregister it
//! - Show the resolved configuration

use anyhow::Result;
use autorun::{config, identity, Autorun, AutorunConfig, AutorunError, ConfigSource};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "autorun")]
#[command(author = "Autorun Team")]
#[command(version)]
#[command(about = "Manage launch-at-login registration on macOS and Windows")]
#[command(long_about = "
Autorun registers an application to start when the user logs in.

macOS identifies the login item by executable path, Windows identifies the
Run key value by app name. Always pass the same --app-name and --path.

Quick start:
  1. Check state:  autorun --app-name MyApp --path /Applications/MyApp.app status
  2. Register:     autorun --app-name MyApp --path /Applications/MyApp.app enable
  3. Unregister:   autorun --app-name MyApp --path /Applications/MyApp.app disable
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Name of the startup entry (registry value name on Windows)
    #[arg(short, long, global = true)]
    pub app_name: Option<String>,

    /// Program launched at login (login item path on macOS)
    #[arg(short, long, global = true)]
    pub path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show whether the application starts at login
    #[command(alias = "is-set")]
    Status,

    /// Register the application to start at login
    Enable,

    /// Remove the application's startup entry
    Disable,

    /// Report whether this platform is supported
    Supported,

    /// Show configuration paths and settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("autorun={},autorun_cli={}", log_level, log_level).into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_autorun_config();
    let autorun = build_autorun(&cli, &config);

    match cli.command {
        Commands::Status => cmd_status(&cli, &autorun).await,
        Commands::Enable => cmd_enable(&cli, &autorun).await,
        Commands::Disable => cmd_disable(&cli, &autorun).await,
        Commands::Supported => cmd_supported(&cli, &autorun),
        Commands::Config => cmd_config(&cli, &autorun, &config),
    }
}

/// Command-line flags take priority over the loaded configuration
fn build_autorun(cli: &Cli, config: &AutorunConfig) -> Autorun {
    let mut builder = Autorun::builder();
    if let Some(name) = &cli.app_name {
        builder = builder.app_name(name.as_str());
    }
    if let Some(path) = &cli.path {
        builder = builder.executable_path(path.as_str());
    }
    builder.config(config).build()
}

/// Print `err` in the requested format and hand it back for the exit status
fn report_error(cli: &Cli, err: AutorunError) -> anyhow::Error {
    if let OutputFormat::Json = cli.format {
        println!("{}", serde_json::json!({
            "error": err.kind(),
            "platform": err.platform(),
            "message": err.to_string(),
            "cause": err.cause().map(|c| c.to_string()),
        }));
    }
    anyhow::Error::new(err)
}

async fn cmd_status(cli: &Cli, autorun: &Autorun) -> Result<()> {
    let enabled = autorun.is_set().await.map_err(|e| report_error(cli, e))?;

    match cli.format {
        OutputFormat::Text => {
            println!("Autostart: {}", if enabled { "enabled" } else { "disabled" });
            println!("Entry:     {}", autorun.identity());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "enabled": enabled,
                "platform": autorun.platform(),
                "app_name": autorun.app_name(),
                "executable_path": autorun.executable_path(),
            }));
        }
    }

    Ok(())
}

async fn cmd_enable(cli: &Cli, autorun: &Autorun) -> Result<()> {
    let enabled = autorun.enable().await.map_err(|e| report_error(cli, e))?;

    match cli.format {
        OutputFormat::Text => {
            if enabled {
                println!("Enabled autostart for '{}'", autorun.identity());
            } else {
                println!("Could not enable autostart for '{}'", autorun.identity());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "status": if enabled { "enabled" } else { "not_enabled" },
                "result": enabled,
                "platform": autorun.platform(),
                "app_name": autorun.app_name(),
                "executable_path": autorun.executable_path(),
            }));
        }
    }

    Ok(())
}

async fn cmd_disable(cli: &Cli, autorun: &Autorun) -> Result<()> {
    let removed = autorun.disable().await.map_err(|e| report_error(cli, e))?;

    match cli.format {
        OutputFormat::Text => {
            if removed {
                println!("Disabled autostart for '{}'", autorun.identity());
            } else {
                println!("No autostart entry for '{}'", autorun.identity());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "status": if removed { "disabled" } else { "not_found" },
                "result": removed,
                "platform": autorun.platform(),
                "app_name": autorun.app_name(),
                "executable_path": autorun.executable_path(),
            }));
        }
    }

    Ok(())
}

fn cmd_supported(cli: &Cli, autorun: &Autorun) -> Result<()> {
    let supported = autorun.is_platform_supported();

    match cli.format {
        OutputFormat::Text => {
            if supported {
                println!("Platform '{}' is supported", autorun.platform());
            } else {
                println!("Platform '{}' is not supported", autorun.platform());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "platform": autorun.platform(),
                "supported": supported,
            }));
        }
    }

    Ok(())
}

fn source_label(flag: &Option<String>, source: ConfigSource) -> String {
    if flag.is_some() {
        "command line".to_string()
    } else {
        source.to_string()
    }
}

fn cmd_config(cli: &Cli, autorun: &Autorun, config: &AutorunConfig) -> Result<()> {
    let config_path = config::get_config_file_path_string();
    let app_name_source = source_label(&cli.app_name, config.app_name_source);
    let path_source = source_label(&cli.path, config.executable_path_source);
    let path_exists = identity::path_exists(autorun.executable_path());

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:      {}", config_path);
            println!("Platform:         {}", autorun.platform());
            println!("App name:         {} (from {})", autorun.app_name(), app_name_source);
            println!("Executable path:  {} (from {})", autorun.executable_path(), path_source);
            if !path_exists {
                println!("                  (does not exist)");
            }
            println!();
            println!("Environment variables:");
            println!("  {} - Override app name", config::ENV_APP_NAME);
            println!("  {} - Override executable path", config::ENV_EXECUTABLE_PATH);
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", config::generate_example_config());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "config_file": config_path,
                "platform": autorun.platform(),
                "supported": autorun.is_platform_supported(),
                "app_name": autorun.app_name(),
                "app_name_source": app_name_source,
                "executable_path": autorun.executable_path(),
                "executable_path_source": path_source,
                "executable_path_exists": path_exists,
            }));
        }
    }

    Ok(())
}
