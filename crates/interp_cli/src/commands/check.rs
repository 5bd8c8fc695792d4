//! Check command: reports the resolved configuration.

use interp_core::interp::{Interpolator, ShardStrategy};
use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Logs the effective configuration and the worker pool it produced.
pub fn run(config: &CliConfig, interpolator: &Interpolator) -> Result<()> {
    let interp = interpolator.config();

    info!("Configuration check");
    info!("  Log level: {}", config.log_level);
    info!("  Available CPUs: {}", num_cpus::get());
    match interp.threads() {
        Some(threads) => info!("  Worker pool: dedicated ({} threads)", threads),
        None => info!("  Worker pool: global ({} threads)", interpolator.workers()),
    }
    match interp.strategy() {
        ShardStrategy::Sequential => info!("  Strategy: sequential"),
        ShardStrategy::FixedChunks { chunk_size } => {
            info!("  Strategy: fixed chunks of {} queries", chunk_size)
        }
        ShardStrategy::CostModel => info!(
            "  Strategy: cost model ({} per knot, {} minimum per shard)",
            interp.cost_per_knot(),
            interp.min_cost_per_shard()
        ),
    }
    info!("  Knot check: {:?}", interp.knot_check());

    if interp.threads().is_some_and(|t| t > num_cpus::get()) {
        info!("  Note: worker pool is larger than the number of CPUs");
    }

    info!("Configuration OK");
    Ok(())
}
