use anyhow::{bail, Result};
use clap::Parser;
use scraper::Html;
use std::fs;

use parts_finder::config::Config;
use parts_finder::models::Supplier;
use parts_finder::scrapers::static_strategy_for;
use parts_finder::utils::fingerprint::FingerprintRotation;
use parts_finder::utils::http::{build_search_url, create_client, fetch_page};
use parts_finder::utils::rng::SharedRng;

/// Fetch one supplier's search page and report what the locators find.
#[derive(Debug, Parser)]
#[command(name = "analyze_html")]
struct Args {
    /// grainger, mcmaster or fastenal
    #[arg(short, long, default_value = "grainger")]
    supplier: String,

    #[arg(short, long, default_value = "6203 bearing")]
    query: String,

    /// Records to extract at most
    #[arg(short, long, default_value_t = 5)]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let Some(supplier) = Supplier::from_key(&args.supplier) else {
        bail!("Unknown supplier {}, expected grainger, mcmaster or fastenal", args.supplier);
    };

    let config = Config::load()?;
    let client = create_client(&config.fetch)?;
    let site = config.supplier(supplier)?;
    let url = build_search_url(site, &args.query)?;

    let rotation = FingerprintRotation::new(config.fingerprints.clone());
    let fingerprint = SharedRng::from_entropy().with(|rng| rotation.select(rng).clone());

    println!("Fetching {} as {}...", url, fingerprint.name);
    let html = fetch_page(&client, &url, &fingerprint, site.timeout()).await?;

    let sample = format!("{}_sample.html", supplier.key());
    fs::write(&sample, &html)?;
    println!("Saved {} bytes to {}", html.len(), sample);

    let strategy = static_strategy_for(supplier, &config, client)?;
    let parser = strategy.parser();
    let document = Html::parse_document(&html);

    for (selector, count) in parser.container_matches(&document) {
        println!("Selector '{}' matched {} elements", selector, count);
    }

    let records = parser.parse_document(&document, args.limit);
    println!("\nExtracted {} records", records.len());
    for record in &records {
        println!(
            "  {} | {} | {} | {}",
            record.part_number(),
            record.name(),
            record.price_text(),
            record.availability()
        );
    }

    Ok(())
}
