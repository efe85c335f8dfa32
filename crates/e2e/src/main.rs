//! che-e2e command line entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use che_e2e::driver::webdriver::WebDriverSessions;
use che_e2e::{scenarios, E2eConfig, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "che-e2e")]
#[command(about = "End-to-end scenario runner for the Eclipse Che IDE")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available scenarios
    List,

    /// Run scenarios against a Che installation
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Run only this scenario (catalogue id or full name)
    #[arg(short, long)]
    scenario: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Che base URL
    #[arg(long)]
    base_url: Option<String>,

    /// WebDriver endpoint
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    headless: Option<bool>,

    /// Output directory for results and screenshots
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the rest of a suite after its first failing test
    #[arg(long)]
    bail: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let result = match cli.command {
        Command::List => {
            list();
            Ok(true)
        }
        Command::Run(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(run(args)),
            Err(e) => Err(anyhow::Error::new(e).context("failed to create tokio runtime")),
        },
    };

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn list() {
    for (id, build) in scenarios::CATALOGUE {
        let scenario = build();
        println!("{:<16} {} ({} tests)", id, scenario.name(), scenario.test_count());
        if !scenario.about().is_empty() {
            println!("{:<16} {}", "", scenario.about());
        }
    }
}

async fn run(args: RunArgs) -> anyhow::Result<bool> {
    let mut config = E2eConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    if let Some(url) = args.webdriver_url {
        config.webdriver_url = url;
    }
    if let Some(headless) = args.headless {
        config.browser.headless = headless;
    }
    if let Some(output) = args.output {
        config.runner.output_dir = output;
    }
    if args.bail {
        config.runner.bail = true;
    }

    let selected = match &args.scenario {
        Some(name) => vec![scenarios::by_name(name)?],
        None => scenarios::all(),
    };

    info!("Che E2E v{} against {}", env!("CARGO_PKG_VERSION"), config.base_url());

    let config = Arc::new(config);
    let runner = ScenarioRunner::new(config.clone(), Arc::new(WebDriverSessions::new(config.clone())));
    let summary = runner.run_all(&selected).await;

    summary
        .write(&config.runner.output_dir)
        .context("failed to write test results")?;

    Ok(summary.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "che-e2e",
            "run",
            "--scenario",
            "dotnet-core",
            "--headless",
            "false",
            "--bail",
        ])
        .unwrap();

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.scenario.as_deref(), Some("dotnet-core"));
                assert_eq!(args.headless, Some(false));
                assert!(args.bail);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["che-e2e", "list", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::List));
    }
}
