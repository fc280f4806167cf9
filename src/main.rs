use anyhow::{Context, Result};
use food_diary::cli::parse_args;
use food_diary::config::AppConfig;
use food_diary::log_processor::{process_food_log, read_food_log};
use food_diary::oracle::LlmNutritionOracle;
use food_diary::products::load_known_products;
use food_diary::report::{export_csv, render_report};
use food_diary::resolver::ProductResolver;
use food_diary::totals::compute_totals;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli_args = parse_args();
    food_diary::logging::init(cli_args.verbose);

    let config = AppConfig::from_cli(&cli_args).context("Invalid configuration")?;
    if config.api_key.is_none() {
        warn!(
            provider = ?config.provider,
            "No API key configured; products missing from the table will be skipped"
        );
    }

    let table = load_known_products(&config.products_csv).with_context(|| {
        format!(
            "Failed to load known products from '{}'",
            config.products_csv.display()
        )
    })?;
    info!(products = table.len(), "Product table loaded");

    let lines = read_food_log(&config.log_file)
        .await
        .with_context(|| format!("Failed to read food log '{}'", config.log_file.display()))?;

    let provider = config
        .build_provider()
        .context("Failed to build HTTP client")?;
    let oracle = LlmNutritionOracle::new(provider, config.model.clone());
    let resolver = ProductResolver::new(&table, &oracle);

    let records = process_food_log(&lines, &resolver).await;
    let (scaled, totals) = compute_totals(&records);

    render_report(&scaled, &totals);

    if let Some(path) = &config.output_csv {
        export_csv(path, &scaled, &totals)
            .with_context(|| format!("Failed to write report to '{}'", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    Ok(())
}
