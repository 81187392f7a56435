use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::api_client::WeatherFetcher;
use crate::service::WeatherService;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Spawns the periodic refresh of every cached city.
///
/// The first tick fires one `period` after start. With `enabled` false each
/// tick does nothing. A zero `period` falls back to
/// [`DEFAULT_REFRESH_INTERVAL`]. The task exits once `shutdown` is cancelled.
pub fn spawn_refresh_loop<F: WeatherFetcher>(
    service: Arc<WeatherService<F>>,
    period: Duration,
    enabled: bool,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let period = if period.is_zero() {
        warn!("Zero refresh period requested, using the default interval");
        DEFAULT_REFRESH_INTERVAL
    } else {
        period
    };

    tokio::spawn(
        async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Refresh loop stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !enabled {
                            debug!("Polling disabled, skipping refresh");
                            continue;
                        }
                        service.refresh_all().await;
                    }
                }
            }
        }
        .instrument(info_span!("refresh_loop", period_secs = period.as_secs())),
    )
}
