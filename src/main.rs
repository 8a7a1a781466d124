use anyhow::Result;
use clap::Parser;
use log::info;

use ltlgen::cli::{commands, Commands, LtlGenCli};
use ltlgen::implementations::config::ProcessorConfig;
use ltlgen::implementations::llm_processor::LlmPropertyProcessor;
use ltlgen::store::DataStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env so ANTHROPIC_API_KEY and friends are visible
    dotenv::dotenv().ok();

    let cli = LtlGenCli::parse();
    setup_logging(&cli.log_level);

    let store = DataStore::new(&cli.data_dir)?;

    match &cli.command {
        Commands::Run {
            input,
            approver,
            interactive,
        } => {
            let config = load_config(&cli)?;
            let processor = LlmPropertyProcessor::new(config);
            commands::run::execute(&processor, &store, input, approver, *interactive).await?;
        }

        Commands::Extract { input, content } => {
            commands::extract::execute(input, *content)?;
        }

        Commands::View => {
            commands::view::execute(&store)?;
        }

        Commands::Export { table, output } => {
            commands::export::execute(&store, table, output.as_deref())?;
        }

        Commands::Stats => {
            commands::stats::execute(&store)?;
        }
    }

    Ok(())
}

fn load_config(cli: &LtlGenCli) -> Result<ProcessorConfig> {
    match &cli.config {
        Some(path) => Ok(ProcessorConfig::from_file(path)?),
        None => Ok(ProcessorConfig::default()),
    }
}

fn setup_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
