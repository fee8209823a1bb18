//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries and
//! rate-limit counters whose window has closed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::Caches;
use crate::limiter::IntervalRateLimiter;

/// Spawns a background task that sweeps every cache and the limiter.
///
/// Each lock is held only for its own sweep. The returned handle is
/// aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(state.caches.clone(), state.limiter.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(
    caches: Caches,
    limiter: Arc<RwLock<IntervalRateLimiter>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let entries = caches.sweep_expired().await;
            let tokens = limiter.write().await.sweep_expired();

            if entries > 0 || tokens > 0 {
                info!(
                    "Expiry sweep: removed {} cache entries and {} rate-limit tokens",
                    entries, tokens
                );
            } else {
                debug!("Expiry sweep: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::models::WeatherSnapshot;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location: "London".to_string(),
            country: Some("GB".to_string()),
            temperature: 12.0,
            feels_like: 11.0,
            humidity: 80,
            description: "overcast clouds".to_string(),
            icon: "04d".to_string(),
            wind_speed: 3.0,
            sunrise: None,
            sunset: None,
        }
    }

    fn setup(clock: Arc<ManualClock>) -> (Caches, Arc<RwLock<IntervalRateLimiter>>) {
        let caches = Caches::from_config(&Config::default(), clock.clone());
        let limiter = Arc::new(RwLock::new(IntervalRateLimiter::with_clock(
            Duration::from_secs(60),
            10,
            clock,
        )));
        (caches, limiter)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_removes_expired_entries() {
        let clock = Arc::new(ManualClock::new(0));
        let (caches, limiter) = setup(clock.clone());

        caches.weather.write().await.set("weather:city:london", snapshot());
        limiter.write().await.check(10, "203.0.113.7").unwrap();

        // Past both the weather TTL and the limiter window
        clock.advance(Duration::from_secs(1_801));

        let handle = spawn_sweep_task(caches.clone(), limiter.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert!(caches.weather.read().await.is_empty());
        assert!(limiter.read().await.is_empty());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_preserves_valid_entries() {
        let clock = Arc::new(ManualClock::new(0));
        let (caches, limiter) = setup(clock.clone());

        caches.weather.write().await.set("weather:city:london", snapshot());

        let handle = spawn_sweep_task(caches.clone(), limiter, 1);
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        let hit = caches.weather.write().await.get("weather:city:london");
        assert_eq!(hit, Some(snapshot()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let clock = Arc::new(ManualClock::new(0));
        let (caches, limiter) = setup(clock);

        let handle = spawn_sweep_task(caches, limiter, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
