use anyhow::Result;
use clap::Parser;
use salam::{
    AppConfig, Clock, FixedClock, Form, GreetingService, LocalClock,
    backends::create_backend,
    cli::{Cli, Commands, handle_config},
    console::{console, init_console},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_path = dotenv::dotenv().ok();
    let cli = Cli::parse();

    let loaded = AppConfig::load();
    let config_verbosity = loaded
        .as_ref()
        .map(|c| c.get_verbosity())
        .unwrap_or_default();
    init_console(cli.get_effective_verbosity(config_verbosity));

    if let Some(path) = dotenv_path {
        console().debug(&format!("Loaded environment from {}", path.display()));
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            console().warning(&format!("Ignoring config file: {:#}", e));
            AppConfig::default()
        }
    };

    match cli.command {
        Some(Commands::Config { action }) => handle_config(action),
        None => run_form(&cli, &config).await,
    }
}

async fn run_form(cli: &Cli, config: &AppConfig) -> Result<()> {
    let backend_name = cli
        .backend
        .clone()
        .unwrap_or_else(|| config.default_backend.clone());

    let api_key = match config.resolve_api_key(&backend_name, |var| std::env::var(var).ok()) {
        Ok(key) => Some(key),
        Err(_) if !config.requires_api_key(&backend_name) => None,
        Err(e) => {
            console().error(&e.to_string());
            std::process::exit(1);
        }
    };

    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.request_timeout());
    let backend = create_backend(&backend_name, config, api_key, timeout)?;
    console().verbose(&format!(
        "Using backend {} with model {} (timeout {:?})",
        backend.backend_name(),
        backend.model_name(),
        timeout
    ));

    let clock: Arc<dyn Clock> = match cli.hour.and_then(FixedClock::at_hour) {
        Some(fixed) => Arc::new(fixed),
        None => Arc::new(LocalClock),
    };
    let service = GreetingService::new(backend)
        .with_clock(clock)
        .with_boundaries(config.day_boundaries)
        .with_languages(config.languages.clone())
        .with_timeout(timeout);
    let form = Form::new(service);

    if let Some(ref name) = cli.name {
        let submission = form.submit(name).await;
        form.render(&submission);
        if !submission.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    console().banner(form.service().backend_name());
    let submissions = form.run(BufReader::new(tokio::io::stdin())).await?;
    console().debug(&format!("{} submissions", submissions));

    Ok(())
}
