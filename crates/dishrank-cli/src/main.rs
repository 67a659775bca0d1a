//! dishrank command line interface.
//!
//! `search` resolves a free-text query to venue candidates; `dishes` runs
//! the full fetch/extract/aggregate pipeline for a venue id picked from a
//! previous search.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dishrank_core::{AppConfig, Candidate, Query};
use dishrank_extract::ExtractClient;
use dishrank_pipeline::PopularDishes;
use dishrank_places::PlacesClient;

#[derive(Debug, Parser)]
#[command(name = "dishrank")]
#[command(about = "Resolve venues and rank popular dishes from their reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for venues matching a free-text query
    Search {
        /// Free-text venue query, e.g. "tofu house"
        query: String,

        /// Locality hint appended to the query (city, neighborhood, zip)
        #[arg(long)]
        near: Option<String>,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fetch a venue's reviews and rank its popular dishes
    Dishes {
        /// Venue id from a previous `search`
        place_id: String,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dishrank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "loaded configuration");

    let cli = Cli::parse();
    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Commands::Search { query, near, json } => {
            let mut query = Query::new(query);
            if let Some(near) = near {
                query = query.with_near(near);
            }
            let candidates = pipeline.resolve_query(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                print_candidates(&candidates);
            }
        }
        Commands::Dishes { place_id, json } => {
            let result = pipeline.get_popular_items(&place_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.dishes.is_empty() {
                println!("No popular dishes found for {place_id}.");
            } else {
                println!("Popular dishes for {place_id}:");
                for (rank, dish) in result.dishes.iter().enumerate() {
                    println!(
                        "{:>2}. {} — {} mention{}, sentiment {:.2}",
                        rank + 1,
                        dish.name,
                        dish.mention_count,
                        if dish.mention_count == 1 { "" } else { "s" },
                        dish.avg_sentiment
                    );
                    for quote in &dish.sample_quotes {
                        println!("      \"{quote}\"");
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_pipeline(config: &AppConfig) -> anyhow::Result<PopularDishes> {
    let places = PlacesClient::with_base_url(
        &config.places_api_key,
        config.request_timeout_secs,
        &config.places_base_url,
    )?;
    let extract = ExtractClient::with_base_url(
        &config.extract_api_key,
        &config.extract_model,
        config.request_timeout_secs,
        &config.extract_base_url,
    )?;
    Ok(PopularDishes::new(
        places,
        extract,
        Duration::from_secs(config.cache_ttl_secs),
        config.extract_max_concurrent,
        config.top_dishes,
    ))
}

fn print_candidates(candidates: &[Candidate]) {
    if candidates.is_empty() {
        println!("No matching venues.");
        return;
    }
    for (rank, c) in candidates.iter().enumerate() {
        let rating = c
            .rating
            .map_or_else(|| "unrated".to_string(), |r| format!("{r:.1}"));
        println!(
            "{:>2}. {} — {} (rating {}, {} ratings)",
            rank + 1,
            c.name,
            c.address,
            rating,
            c.user_ratings_total.unwrap_or(0)
        );
        println!("      id: {}", c.place_id);
    }
}
