use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sales_etl::cleaning::CleanerRegistry;
use sales_etl::config::{Config, DEFAULT_CONFIG_PATH};
use sales_etl::db::DatabaseConnector;
use sales_etl::logging::init_logging;
use sales_etl::pipeline::{Pipeline, PipelineResult};
use sales_etl::sinks::{sink_for, CsvFileSink, SinkKind};
use sales_etl::sources::{source_for, CsvFileSource};
use sales_etl::types::Dataset;
use std::path::{Path, PathBuf};
use tracing::{error, info, Instrument};

#[derive(Parser)]
#[command(name = "sales_etl")]
#[command(about = "Extracts, cleans and loads the retail sales datasets")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, clean and load datasets from their production sources
    Run {
        /// Datasets to run (comma-separated). Defaults to all of them
        #[arg(long, value_delimiter = ',')]
        datasets: Option<Vec<Dataset>>,
        /// Where cleaned tables go
        #[arg(long, value_enum, default_value_t = SinkKind::Db)]
        sink: SinkKind,
    },
    /// Clean a local CSV export of one dataset
    Clean {
        #[arg(long)]
        dataset: Dataset,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// List the tables of the source database
    ListTables {
        /// List the target database instead
        #[arg(long)]
        target: bool,
    },
}

fn print_result(result: &PipelineResult) {
    println!("\n📊 Pipeline Results for {}:", result.dataset);
    println!("   Rows read: {}", result.rows_read);
    println!("   Rows written: {}", result.rows_written);
    println!("   Rows dropped: {}", result.rows_dropped());
    println!("   Columns: {}", result.columns_written);
    println!("   Destination: {}", result.destination);
}

async fn run_datasets(datasets: &[Dataset], sink_kind: SinkKind, config: &Config) -> anyhow::Result<()> {
    let registry = CleanerRegistry::new();
    let mut failed = Vec::new();

    for &dataset in datasets {
        let span = tracing::info_span!("dataset", name = %dataset);
        let outcome: sales_etl::Result<PipelineResult> = async {
            let source = source_for(dataset, config)?;
            let sink = sink_for(sink_kind, dataset, config);
            Pipeline::run_for_dataset(dataset, source.as_ref(), &registry, sink.as_ref()).await
        }
        .instrument(span)
        .await;

        match outcome {
            Ok(result) => print_result(&result),
            Err(e) => {
                error!("Pipeline failed for {}: {}", dataset, e);
                println!("❌ {} failed: {}", dataset, e);
                failed.push(dataset.name());
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} dataset(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

async fn clean_file(dataset: Dataset, input: &Path, output: &Path) -> anyhow::Result<()> {
    let registry = CleanerRegistry::new();
    let source = CsvFileSource::new(input);
    let sink = CsvFileSink::new(output);

    let result = Pipeline::run_for_dataset(dataset, &source, &registry, &sink)
        .await
        .with_context(|| format!("cleaning {} from {}", dataset, input.display()))?;
    print_result(&result);
    Ok(())
}

async fn list_tables(config: &Config, target: bool) -> anyhow::Result<()> {
    let db_config = if target { &config.target_db } else { &config.source_db };
    let connector = DatabaseConnector::connect(db_config).await?;
    let tables = connector.list_tables().await;
    connector.close().await;

    for table in tables? {
        println!("{table}");
    }
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).with_context(|| format!("loading configuration from {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = init_logging(Path::new("logs"));

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { datasets, sink } => {
            let config = load_config(&cli.config)?;
            let datasets = datasets.unwrap_or_else(|| Dataset::ALL.to_vec());
            info!("Running {} datasets into {:?}", datasets.len(), sink);
            run_datasets(&datasets, sink, &config).await?;
            println!("✅ Pipeline completed successfully!");
        }
        Commands::Clean { dataset, input, output } => {
            clean_file(dataset, &input, &output).await?;
        }
        Commands::ListTables { target } => {
            let config = load_config(&cli.config)?;
            list_tables(&config, target).await?;
        }
    }
    Ok(())
}
