use anyhow::{Context, Result};
use log::info;
use std::env;

use menuwise::costing::{row_cost, total_cost};
use menuwise::import::parse_price_list_csv;
use menuwise::recipe_ai::{auto_fill, GeminiClient};
use menuwise::stats::{dashboard_stats, recent_suppliers};
use menuwise::store::EntityStore;

/// Demo entry point: seeds the store, optionally imports a CSV file given as
/// the first argument, prints the dashboard summary, and optionally runs an
/// AI recipe fill when a recipe name is given as the second argument.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting MenuWise procurement demo");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let mut store = EntityStore::seeded_with_prices(150);

    let mut args = env::args().skip(1);

    if let Some(csv_path) = args.next() {
        let text = std::fs::read_to_string(&csv_path)
            .with_context(|| format!("Failed to read CSV file: {}", csv_path))?;
        let batch = parse_price_list_csv(&text, &store);
        let report = batch.report();
        store.commit(batch);
        println!("{}", report);
    }

    println!("{}", dashboard_stats(&store));
    println!("Recent suppliers:");
    for supplier in recent_suppliers(&store, 5) {
        println!("  {}", supplier);
    }

    if let Some(recipe_name) = args.next() {
        let api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
        let mut client = GeminiClient::new(&api_key);
        if let Ok(model) = env::var("GEMINI_MODEL") {
            client = client.with_model(&model);
        }

        match auto_fill(&client, &store, &recipe_name).await {
            Ok(rows) => {
                println!("Suggested recipe for \"{}\":", recipe_name);
                for row in &rows {
                    println!(
                        "  {:<20} x{:<6} ${:.2}",
                        store.ingredient_display_name(&row.ingredient_id),
                        row.qty,
                        row_cost(&store, row)
                    );
                }
                println!("Total estimated cost: ${:.2}", total_cost(&store, &rows));
            }
            Err(notice) => println!("{}", notice),
        }
    }

    Ok(())
}
