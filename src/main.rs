mod classify;
mod fetch;
mod output;
mod parser;
mod pipeline;
mod record;
mod settings;
mod slug;

use std::collections::HashMap;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use classify::Category;
use fetch::SpiderFetcher;
use pipeline::{RunOptions, Source};
use record::CatalogRecord;
use settings::Settings;

const MERGED_OUTPUT: &str = "catalog.json";

#[derive(Parser)]
#[command(name = "catalog_scraper", about = "Scrape listing pages into normalized catalog records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GitHub trending repositories (daily + weekly)
    GithubTrending,
    /// Product Hunt topic pages (AI, developer tools)
    Producthunt,
    /// There's An AI For That directory pages
    Taaft,
    /// All sources concurrently, plus a merged catalog.json
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(output_dir = %settings.output_dir.display(), max_results = ?settings.max_results, "settings loaded");

    let fetcher = SpiderFetcher::new(settings.spider_api_key.clone())
        .context("Failed to create fetch client")?;

    let result = match cli.command {
        Commands::GithubTrending => run_one(Source::GithubTrending, &fetcher, &settings).await,
        Commands::Producthunt => run_one(Source::ProductHunt, &fetcher, &settings).await,
        Commands::Taaft => run_one(Source::Taaft, &fetcher, &settings).await,
        Commands::All => run_all(&fetcher, &settings).await,
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn scrape(source: Source, fetcher: &SpiderFetcher, settings: &Settings) -> Vec<CatalogRecord> {
    let options = RunOptions {
        max_results: settings.max_results.unwrap_or(source.max_results()),
        page_timeout: settings.page_timeout(),
        cache: settings.cache,
    };
    pipeline::run(source, fetcher, &options).await
}

fn save(filename: &str, records: &[CatalogRecord], settings: &Settings) -> anyhow::Result<()> {
    let path = output::write_output(&settings.output_dir, filename, records)
        .with_context(|| format!("Failed to write {}", filename))?;
    print_categories(records);
    println!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

async fn run_one(source: Source, fetcher: &SpiderFetcher, settings: &Settings) -> anyhow::Result<()> {
    println!("Scraping {}...", source);
    let records = scrape(source, fetcher, settings).await;
    save(&source.output_file(), &records, settings)
}

async fn run_all(fetcher: &SpiderFetcher, settings: &Settings) -> anyhow::Result<()> {
    println!("Scraping {} sources...", Source::ALL.len());
    // Each run owns its own seen-set; joined in Source::ALL order.
    let (github, producthunt, taaft) = tokio::join!(
        scrape(Source::GithubTrending, fetcher, settings),
        scrape(Source::ProductHunt, fetcher, settings),
        scrape(Source::Taaft, fetcher, settings),
    );
    let runs = [
        (Source::GithubTrending, github),
        (Source::ProductHunt, producthunt),
        (Source::Taaft, taaft),
    ];

    for (source, records) in &runs {
        save(&source.output_file(), records, settings)?;
    }
    let merged = pipeline::merge_runs(runs.into_iter().map(|(_, records)| records));
    save(MERGED_OUTPUT, &merged, settings)
}

fn print_categories(records: &[CatalogRecord]) {
    let mut counts: HashMap<Category, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.category).or_default() += 1;
    }
    for category in Category::ALL {
        if let Some(n) = counts.get(&category) {
            println!("  {:<16} {:>4}", category.as_str(), n);
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
