use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, crawl::Crawler, geo::NominatimGeocoder, output::JsonLinesSink};

mod config;
mod crawl;
mod error;
mod geo;
mod output;
mod page_scrapers;
mod record;
mod skills;
#[cfg(test)]
mod test_server;


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    // Loading the model blocks, possibly for a long time on first use while it downloads.
    let tagger = tokio_rayon::spawn(skills::load_tagger).await.context("Failed to load the tagger")?;
    let geocoder = Arc::new(NominatimGeocoder::new(&config)?);
    let mut sink = JsonLinesSink::open(config.output.as_deref())?;

    let crawler = Arc::new(Crawler::new(&config, tagger, geocoder)?);
    let summary = crawler.run(&mut sink).await;

    info!(
        scheduled = summary.scheduled,
        emitted = summary.emitted,
        failed = summary.failed,
        "Scraped"
    );
    Ok(())
}
