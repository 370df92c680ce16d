use actix_web::{web, App, HttpServer};
use clap::Parser;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use job_form_validator::api::{
    health::health_config,
    job::{job_config, JobFormService},
    validation,
};
use job_form_validator::cli::{self, Cli, CliError, Command};
use job_form_validator::config::Config;
use job_form_validator::shutdown::ShutdownCoordinator;

/// Console plus per-level daily rolling files
/// Log files are created as: logs/info.log.2024-12-22, logs/error.log.2024-12-22, etc.
fn init_server_tracing(log_dir: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    Ok(())
}

/// Offline commands keep stdout for their output and log to stderr
fn init_cli_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: Config) -> std::io::Result<()> {
    init_server_tracing(&config.log_dir)?;

    info!("Starting job-form-validator");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max forms per bulk request: {}", config.max_bulk_forms);
    if let Some(workers) = config.num_workers {
        info!("  - Number of workers: {}", workers);
    }

    let max_payload_size = config.max_payload_size;
    let max_bulk_forms = config.max_bulk_forms;

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(JobFormService::new(max_bulk_forms)))
            .app_data(validation::json_config(max_payload_size))
            .app_data(validation::plain_json_config(max_payload_size))
            .configure(health_config)
            .configure(job_config)
    });
    if let Some(workers) = config.num_workers {
        server = server.workers(workers);
    }

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task)
        .wait_for_shutdown()
        .await
}

/// Print the verdict; `Ok(false)` when the form is invalid
fn run_check(file: Option<&Path>, pretty: bool) -> Result<bool, CliError> {
    let result = cli::check_path(file)?;
    println!("{}", cli::render(&result, pretty)?);
    Ok(result.is_valid())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Cli::parse();

    match args.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => {
            let mut config = Config::from_env()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Check { file, pretty } => {
            init_cli_tracing();
            match run_check(file.as_deref(), pretty) {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(2);
                }
            }
        }
        Command::Presets => {
            println!("{}", cli::render_presets());
            Ok(())
        }
    }
}
