//! Watch a live feed and print aggregate snapshots.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use tally_core::data::{Incident, PartyTally, RegionTally};
use tally_feed::{FeedConfig, FeedHandle, FeedManager};
use tally_sync::aggregates::{self, TotalVotesPayload};
use tally_sync::ViewSync;

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Feed endpoint; overrides the configured one
    #[arg(short, long, env = "TALLY_FEED_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Stop after this many seconds (default: run until Ctrl-C)
    #[arg(long)]
    pub duration: Option<u64>,

    /// Seconds between printed summaries
    #[arg(long, default_value_t = 5)]
    pub print_interval: u64,
}

/// Connects to the feed, runs all four aggregates, and prints snapshots
/// until interrupted, the duration elapses, or the feed fails.
pub async fn run(args: WatchArgs, mut config: FeedConfig) -> Result<()> {
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    let refresh = config.refresh_interval();
    let endpoint = config.endpoint.clone();

    let manager = FeedManager::new(config);
    let handle = manager.acquire(&endpoint);

    let mut total = aggregates::global_tally(refresh);
    let mut parties = aggregates::party_breakdown(refresh);
    let mut regions = aggregates::region_breakdown(refresh);
    let mut incidents = aggregates::incidents(refresh);
    total.start(&handle);
    parties.start(&handle);
    regions.start(&handle);
    incidents.start(&handle);

    info!(endpoint = %handle.endpoint(), "watching feed");

    let mut ticker = tokio::time::interval(Duration::from_secs(args.print_interval.max(1)));
    let deadline = args
        .duration
        .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
            _ = ticker.tick() => {
                print_snapshots(&handle, &total, &parties, &regions, &incidents);

                if handle.state().is_failed() {
                    warn!("feed failed; run watch again to retry");
                    break;
                }
                if deadline.is_some_and(|at| tokio::time::Instant::now() >= at) {
                    break;
                }
            }
        }
    }

    total.stop();
    parties.stop();
    regions.stop();
    incidents.stop();
    handle.release();
    Ok(())
}

fn print_snapshots(
    handle: &FeedHandle,
    total: &ViewSync<u64, TotalVotesPayload>,
    parties: &ViewSync<Vec<PartyTally>, tally_core::data::VoteSummary>,
    regions: &ViewSync<Vec<RegionTally>, RegionTally>,
    incidents: &ViewSync<Vec<Incident>, Incident>,
) {
    let snapshot = total.snapshot();
    let liveness = if snapshot.is_live { "live" } else { "not connected" };
    println!();
    println!(
        "total votes: {}  [{} | {}]",
        snapshot.value,
        handle.state(),
        liveness
    );

    let rows = parties.snapshot().value;
    if !rows.is_empty() {
        println!("parties:");
        for row in rows {
            println!("  {:<28} {:>10}  {:>6.2}%", row.name, row.count, row.percent);
        }
    }

    let region_rows = regions.snapshot().value;
    if !region_rows.is_empty() {
        println!("regions:");
        for region in region_rows {
            println!(
                "  {:<28} {:>10}",
                region.name().unwrap_or("(unknown)"),
                region.total_votes
            );
        }
    }

    let incident_rows = incidents.snapshot().value;
    if !incident_rows.is_empty() {
        println!("incidents:");
        for incident in incident_rows {
            println!(
                "  [{:<6}] {} ({})",
                incident.severity, incident.title, incident.location
            );
        }
    }
}
