//! hal-atlas CLI
//!
//! Command-line interface for hal-atlas:
//! - Serve the read-only HTTP API
//! - Filter records by attribute
//! - Show location counts and index statistics
//! - Fetch census statistics into the local cache
//! - Print a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use hal_atlas::api::{serve, ApiConfig, AppState};
use hal_atlas::census::{CensusCache, CensusClient, Demographics};
use hal_atlas::config::{generate_default_config, Config, LoggingConfig};
use hal_atlas::ingest::load_index;
use hal_atlas::view;
use hal_atlas::RecordIndex;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hal-atlas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Index and explore historical lynching records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Incident CSV file (overrides config)
    #[arg(short, long, global = true)]
    pub records: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Filter records by attribute value
    Filter {
        /// Attribute (state, date, victimName, county, victimRace, victimSex, allegedOffense)
        attribute: String,
        /// Value to match exactly
        value: String,
        /// Maximum records to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show incident counts by state and county
    Locations {
        /// Restrict to one state
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Show index statistics
    Stats,

    /// Census statistics
    Census {
        #[command(subcommand)]
        command: CensusCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CensusCommand {
    /// Fetch county statistics and write them to the cache
    Fetch {
        /// States to fetch (default: every state in the records)
        states: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(records) = &cli.records {
        config.data.records_path = records.clone();
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Serve { host, port } => {
            let mut api_config: ApiConfig = config.api.clone().into();
            if let Some(host) = host {
                api_config.host = host;
            }
            if let Some(port) = port {
                api_config.port = port;
            }

            let index = load_records(&config)?;
            let demographics = CensusCache::load(&config.data.census_cache).to_demographics();
            tracing::info!("Demographics: {} counties", demographics.len());

            let state = AppState::new(index, demographics, api_config.clone());
            serve(state, &api_config).await?;
        }

        Commands::Filter {
            attribute,
            value,
            limit,
        } => {
            let index = load_records(&config)?;
            let view = view::filtered(&index, &attribute, &value, limit)?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutputFormat::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    for record in &view.records {
                        writer.serialize(record)?;
                    }
                    writer.flush()?;
                }
                OutputFormat::Table => {
                    println!(
                        "{:<12} {:<6} {:<20} {:<28} {:<8} {:<8} {}",
                        "DATE", "STATE", "COUNTY", "VICTIM", "RACE", "SEX", "OFFENSE"
                    );
                    for record in &view.records {
                        println!(
                            "{:<12} {:<6} {:<20} {:<28} {:<8} {:<8} {}",
                            record.date().to_string(),
                            record.state(),
                            record.county_name().unwrap_or("-"),
                            record.victim_name().unwrap_or("-"),
                            record.victim_race().unwrap_or("-"),
                            record.victim_sex().unwrap_or("-"),
                            record.alleged_offense().unwrap_or("-"),
                        );
                    }
                    println!(
                        "\n{} of {} records where {} = {:?}",
                        view.records.len(),
                        view.total,
                        view.attribute,
                        view.value
                    );
                }
            }
        }

        Commands::Locations { state } => {
            let index = load_records(&config)?;
            let demographics = CensusCache::load(&config.data.census_cache).to_demographics();
            let Some(summaries) =
                view::location_summaries(&index, &demographics, state.as_deref())
            else {
                bail!("unknown state: {}", state.unwrap_or_default());
            };

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
                OutputFormat::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    writer.write_record(["state", "county", "incidents", "population", "per_100k"])?;
                    for s in &summaries {
                        writer.write_record([
                            s.state.clone(),
                            s.county.clone(),
                            s.incidents.to_string(),
                            s.stats.as_ref().map(|c| c.population.to_string()).unwrap_or_default(),
                            s.incidents_per_100k.map(|r| format!("{:.2}", r)).unwrap_or_default(),
                        ])?;
                    }
                    writer.flush()?;
                }
                OutputFormat::Table => {
                    println!(
                        "{:<6} {:<24} {:>9} {:>12} {:>9}",
                        "STATE", "COUNTY", "INCIDENTS", "POPULATION", "PER 100K"
                    );
                    for s in &summaries {
                        println!(
                            "{:<6} {:<24} {:>9} {:>12} {:>9}",
                            s.state,
                            if s.county.is_empty() { "(unknown)" } else { &s.county },
                            s.incidents,
                            s.stats
                                .as_ref()
                                .map(|c| c.population.to_string())
                                .unwrap_or_else(|| "-".to_string()),
                            s.incidents_per_100k
                                .map(|r| format!("{:.2}", r))
                                .unwrap_or_else(|| "-".to_string()),
                        );
                    }
                }
            }
        }

        Commands::Stats => {
            let index = load_records(&config)?;
            let stats = index.stats();

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => {
                    println!("Records:   {}", stats.records);
                    println!("States:    {}", stats.states);
                    println!("Locations: {}", stats.locations);
                    println!("Depth:     {}", stats.depth);
                    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
                        println!("Range:     {} to {}", earliest, latest);
                    }
                }
            }
        }

        Commands::Census {
            command: CensusCommand::Fetch { states },
        } => {
            let states = if states.is_empty() {
                let index = load_records(&config)?;
                let known: Vec<String> = index
                    .location_counts()
                    .states()
                    .map(str::to_string)
                    .collect();
                known
            } else {
                states
            };
            if states.is_empty() {
                bail!("no states to fetch");
            }

            let client = CensusClient::new(config.census.client_config())?;
            let fetched = Demographics::collect(&client, &states).await?;

            let mut cache = CensusCache::load(&config.data.census_cache);
            cache.merge(fetched.to_vec());
            cache.save()?;

            println!(
                "Fetched {} counties into {:?}",
                fetched.len(),
                config.data.census_cache
            );
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    std::io::stdout().write_all(content.as_bytes())?;
                }
            }
        }
    }

    Ok(())
}

/// Load the incident CSV configured in `config`
fn load_records(config: &Config) -> anyhow::Result<RecordIndex> {
    let path = &config.data.records_path;
    let (index, result) = load_index(path, config.data.row_policy)
        .with_context(|| format!("loading records from {:?}", path))?;

    if result.rows_failed > 0 {
        tracing::warn!(
            "Skipped {} invalid rows (first: {})",
            result.rows_failed,
            result.errors.first().map(String::as_str).unwrap_or("-")
        );
    }

    Ok(index)
}

/// Install the tracing subscriber; logs go to stderr so stdout stays clean
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("hal_atlas={},tower_http=info", config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
