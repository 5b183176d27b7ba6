use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "accident-warehouse")]
#[command(about = "Load accident, vehicle and road condition records into a star-schema warehouse")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path [default: accident_warehouse.log]")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the warehouse from a directory of source CSV files
    Run {
        #[arg(
            short,
            long,
            help = "Directory holding Vehicles.csv, Accidents.csv and RoadConditions.csv"
        )]
        source_dir: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "SQLite warehouse file [default: accident_data_warehouse.db]"
        )]
        database: Option<PathBuf>,

        #[arg(long, help = "Seed for placeholder VehicleID/RoadConditionID assignment")]
        seed: Option<u64>,

        #[arg(long, help = "Fact rows to sample after loading")]
        sample: Option<usize>,

        #[arg(long, help = "Field delimiter of the source files")]
        delimiter: Option<String>,

        #[arg(long, help = "Hide the progress spinner")]
        quiet: bool,
    },

    /// Count warehouse rows and sample the fact table
    Validate {
        #[arg(short, long)]
        database: Option<PathBuf>,

        #[arg(long)]
        sample: Option<usize>,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },

    /// Print the first rows of every warehouse table
    Inspect {
        #[arg(short, long)]
        database: Option<PathBuf>,

        #[arg(short, long, default_value = "10")]
        rows: usize,
    },
}
