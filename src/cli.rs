use clap::Parser;
use std::path::PathBuf;

use crate::api_connection::ProviderKind;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the food diary, one entry per line
    #[arg(short, long, default_value = "food_log.txt")]
    pub log_file: PathBuf,

    /// Path to the known-products CSV
    #[arg(short, long, default_value = "food_db.csv")]
    pub products_csv: PathBuf,

    /// JSON file holding `openai_api_key`, used when OPENAI_API_KEY is not set
    #[arg(short, long, default_value = "keys.json")]
    pub keys_file: PathBuf,

    /// Chat-completions backend used for unknown products
    #[arg(long, value_enum, default_value_t = ProviderKind::OpenAi)]
    pub provider: ProviderKind,

    /// Model asked for nutrition facts
    #[arg(short, long, default_value = "gpt-4o")]
    pub model: String,

    /// Override the backend base URL
    #[arg(long, env = "FOOD_DIARY_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Timeout for one oracle request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Also write the scaled records and totals to this CSV file
    #[arg(short, long)]
    pub output_csv: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
