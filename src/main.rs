#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::Parser;
use listing::ChannelMap;
use playlist::{
    AddressRemap,
    writer::{LOCAL_ADDRESS, UPSTREAM_ADDRESS},
};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use util::{fetch_text, init_http_client, spawn_ct_watcher};

pub mod error;
pub mod listing;
pub mod playlist;
pub mod util;

const DEFAULT_LISTING_URL: &str = "http://epg.51zmt.top:8000";
const DEFAULT_PLAYLIST_URL: &str =
    "https://raw.githubusercontent.com/qwerttvv/Beijing-IPTV/master/IPTV-Unicom.m3u";

/// Rebuilds an IPTV playlist with logos and categories from a channel listing page
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Channel listing page to take names, categories and logos from
    #[arg(long, env = "LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    listing_url: String,

    /// Upstream M3U playlist to rewrite
    #[arg(long, env = "PLAYLIST_URL", default_value = DEFAULT_PLAYLIST_URL)]
    playlist_url: String,

    /// Where the rewritten playlist is written
    #[arg(short, long, default_value = "IPTV-Unicom.m3u")]
    output: PathBuf,

    /// Also write the scraped channel table as JSON
    #[arg(long)]
    channels_json: Option<PathBuf>,

    /// Stream address host:port to rewrite
    #[arg(long, default_value = UPSTREAM_ADDRESS)]
    remap_from: String,

    /// Replacement host:port for `--remap-from`
    #[arg(long, default_value = LOCAL_ADDRESS)]
    remap_to: String,

    /// Timeout of each download, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let client = init_http_client(Duration::from_secs(args.timeout))?;

    let ct = CancellationToken::new();
    spawn_ct_watcher(ct.clone());

    select! {
        () = ct.cancelled() => bail!("Interrupted, nothing was written"),
        res = run(&args, &client) => res,
    }
}

async fn run(args: &Args, client: &reqwest::Client) -> Result<()> {
    info!("Fetching channel listing from {}", args.listing_url);
    let listing = fetch_text(client, &args.listing_url)
        .await
        .context("Fetching channel listing")?;
    let channels = listing::scrape(&listing).context("Scraping channel listing")?;
    info!("Found {} channels in the listing", channels.len());

    info!("Fetching playlist from {}", args.playlist_url);
    let source = fetch_text(client, &args.playlist_url)
        .await
        .context("Fetching playlist")?;
    let mut playlist = playlist::parse(&source).context("Parsing playlist")?;
    info!("Parsed {} playlist entries", playlist.entries.len());

    let matched = playlist::enrich(&mut playlist, &channels);
    let unmatched = playlist.entries.len() - matched;
    info!("Enriched {matched} entries from the listing");
    if unmatched > 0 {
        warn!("{unmatched} entries have no listing match and use the default group");
    }

    let remap = AddressRemap {
        from: args.remap_from.clone(),
        to: args.remap_to.clone(),
    };
    let rendered = playlist::serialize_with_remap(&playlist, &remap);
    let channels_json = match &args.channels_json {
        Some(path) => Some((path, render_channels_json(&channels)?)),
        None => None,
    };

    tokio::fs::write(&args.output, rendered)
        .await
        .with_context(|| format!("Writing playlist to {:?}", args.output))?;
    info!("Wrote playlist to {:?}", args.output);

    if let Some((path, json)) = channels_json {
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Writing channel table to {path:?}"))?;
        info!("Wrote channel table to {path:?}");
    }

    Ok(())
}

/// Channel table as pretty JSON, sorted by name
fn render_channels_json(channels: &ChannelMap) -> Result<String> {
    let sorted = channels.iter().collect::<BTreeMap<_, _>>();
    serde_json::to_string_pretty(&sorted).context("Serializing channel table")
}
