use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use cglaunch::cli::{Cli, Commands};
use cglaunch::config::{self, Config};
use cglaunch::docker::ShellRunner;
use cglaunch::health::SystemClock;
use cglaunch::storage::{DgraphEngine, StorageEngine, dgraph::DGRAPH_DOCS_URL};
use cglaunch::{LaunchContext, Launcher, ProvisioningOutcome};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cglaunch::logging::init(cli.verbose);

    match cli.command {
        Commands::Launch => launch(&cli),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => match config::default_config_dir() {
            Some(dir) => config::load(&dir)?,
            None => Config::default(),
        },
    };
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = Some(dir.clone());
    }
    Ok(cfg)
}

fn launch(cli: &Cli) -> Result<()> {
    let cfg = load_config(cli)?;
    let ctx = LaunchContext::from_config(&cfg).context("failed to prepare launch")?;
    let engine = DgraphEngine::new(ctx.connection.clone());

    let report = Launcher::new(&ctx, &ShellRunner, &engine, &SystemClock).run();

    match report.outcome {
        ProvisioningOutcome::Success { endpoint, .. } => {
            println!("Access your dgraph instance at {endpoint}");
            println!("For more information on dgraph, see the dgraph docs at: {DGRAPH_DOCS_URL}");
            info!(engine = engine.name(), "launch complete");
            Ok(())
        }
        ProvisioningOutcome::DockerMissing(err) => {
            eprintln!("{err}");
            error!("container runtime missing, exiting");
            std::process::exit(1);
        }
        other => {
            let code = other.exit_code();
            let err = other
                .into_result()
                .err()
                .context("launch reported failure without an error")?;
            error!(exit_code = code, "launch failed");
            Err(anyhow::Error::new(err))
        }
    }
}
