//! CLI entrypoint for namesmith
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use namesmith_application::{AvailabilityOracle, SessionService, SessionStore};
use namesmith_infrastructure::{
    CheckerMode, ConfigLoader, FileConfig, FileSessionStore, GeminiProvider, MemorySessionStore,
    OpenAiProvider, ProviderAdapter, RdapOracle, RoutingGateway, SearchOracle, SessionLogRouter,
};
use namesmith_infrastructure::config::Severity;
use namesmith_presentation::{Cli, OutputConfig, ReplConfig, SessionRepl};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Console filter from `-v`, unless `RUST_LOG` is set
fn console_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Console logging plus a debug log file under `logs_dir`.
///
/// The returned guard flushes the file writer on drop.
fn init_logging(verbose: u8, logs_dir: &Path) -> Option<WorkerGuard> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter(verbose));

    let file_appender = std::fs::create_dir_all(logs_dir)
        .ok()
        .and_then(|_| {
            RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix("namesmith.log")
                .build(logs_dir)
                .ok()
        });

    match file_appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            tracing_subscriber::registry().with(console).with(file).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(console).init();
            None
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow::anyhow!("{}", e))?
    };

    if let Some(mode) = &cli.checker {
        let Some(mode) = CheckerMode::parse(mode) else {
            bail!("Unknown checker mode '{}'. Use 'rdap' or 'search'.", mode);
        };
        config.checker.mode = mode.as_str().to_string();
    }
    if cli.persist {
        config.session.persist = true;
    }
    Ok(config)
}

fn build_providers(config: &FileConfig) -> Vec<Arc<dyn ProviderAdapter>> {
    let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
    let settings = &config.providers;

    if let Some(openai) = OpenAiProvider::from_settings(
        settings.openai.api_key.as_deref(),
        &settings.openai.api_key_env,
        &settings.openai.base_url,
    ) {
        providers.push(Arc::new(openai));
    }
    if let Some(gemini) = GeminiProvider::from_settings(
        settings.gemini.api_key.as_deref(),
        &settings.gemini.api_key_env,
        &settings.gemini.base_url,
    ) {
        providers.push(Arc::new(gemini));
    }
    providers
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _log_guard = init_logging(cli.verbose, &config.session.logs_dir);

    info!("Starting namesmith");

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("config {}", issue),
            Severity::Warning => warn!("config {}", issue),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }

    if !config.output.resolve_color(cli.no_color) {
        colored::control::set_override(false);
    }

    let runtime = config.to_namesmith_config();
    let mode = config.checker_mode();

    // === Dependency Injection ===
    let providers = build_providers(&config);
    if providers.is_empty() {
        bail!(
            "No provider credentials found. Set {} or {}.",
            config.providers.openai.api_key_env,
            config.providers.gemini.api_key_env
        );
    }
    let gateway = Arc::new(RoutingGateway::new(
        providers,
        &config.providers.to_routing(),
    ));
    info!("{} provider(s) registered", gateway.provider_count());

    let oracle: Arc<dyn AvailabilityOracle> = match mode {
        CheckerMode::Rdap => Arc::new(RdapOracle::with_bootstrap_url(
            config.checker.request_timeout(),
            config
                .checker
                .bootstrap_url
                .as_deref()
                .unwrap_or(namesmith_infrastructure::availability::DEFAULT_BOOTSTRAP_URL),
        )?),
        CheckerMode::Search => Arc::new(SearchOracle::new(
            Arc::clone(&gateway),
            config.checker.parse_search_model().0,
        )),
    };
    info!("Availability checker: {}", mode);

    let store: Arc<dyn SessionStore> = if config.session.persist {
        let store = FileSessionStore::new(&config.session.dir);
        store.init().await?;
        info!("Persisting sessions to {}", store.dir().display());
        Arc::new(store)
    } else {
        Arc::new(MemorySessionStore::new())
    };

    let transcript = Arc::new(SessionLogRouter::new(&config.session.logs_dir));

    let service = Arc::new(
        SessionService::new(gateway, oracle, store, runtime).with_conversation_logger(transcript),
    );

    let repl = SessionRepl::new(service)
        .with_settings(cli.session_settings())
        .with_output(OutputConfig {
            format: config.output.resolve_format(cli.format),
        })
        .with_repl_config(ReplConfig {
            show_progress: !cli.quiet,
            ..Default::default()
        });

    if cli.once {
        let Some(brief) = cli.brief.as_deref().filter(|b| !b.trim().is_empty()) else {
            bail!("A brief is required with --once.");
        };
        println!("{}", repl.run_once(brief).await?);
        return Ok(());
    }

    repl.run(cli.brief.clone()).await?;
    Ok(())
}
