//! Real-time playback of a scenario in the terminal.

use crate::scenario::Scenario;
use crate::simulate::Replay;
use chrono::{DateTime, Utc};
use log::info;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use wxmap_core::timeline::{PlaybackSpeed, TickOutcome};

/// Periodic tick source. The interval task is aborted when the timer is
/// dropped, so an early return never leaves it running.
pub struct TickTimer {
    handle: JoinHandle<()>,
    ticks: mpsc::Receiver<()>,
}

impl TickTimer {
    pub fn start(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let (tx, ticks) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { handle, ticks }
    }

    /// Wait for the next tick. `false` once the task is gone.
    pub async fn tick(&mut self) -> bool {
        self.ticks.recv().await.is_some()
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// How a playback run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySummary {
    pub ticks: usize,
    pub finished_at: DateTime<Utc>,
}

fn log_colors(replay: &Replay, at: DateTime<Utc>) {
    for row in replay.rows_at(at) {
        let value = row
            .value
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "--".to_string());
        info!(
            "{} {} {}={} {}",
            row.timestamp, row.region_id, row.data_source, value, row.color
        );
    }
}

/// Play `scenario` from range start until the clock reaches range end.
pub async fn play_scenario(scenario: Scenario, speed: f64) -> anyhow::Result<PlaySummary> {
    let replay = Replay::prepare(scenario).await?;
    let mut playback = replay.scenario.config.playback(replay.range);
    playback.set_speed(PlaybackSpeed::from_multiplier(speed));

    if !playback.play() {
        info!("range is empty, nothing to play");
        return Ok(PlaySummary {
            ticks: 0,
            finished_at: playback.current(),
        });
    }
    info!(
        "playing {} hour(s) at {} ({} ms per hour)",
        playback.total_hours(),
        playback.speed().label(),
        playback.interval().as_millis()
    );
    log_colors(&replay, playback.current());

    let mut timer = TickTimer::start(playback.interval());
    let mut ticks = 0;
    while timer.tick().await {
        ticks += 1;
        match playback.tick() {
            TickOutcome::Advanced(t) => log_colors(&replay, t),
            TickOutcome::Finished(t) => {
                return Ok(PlaySummary {
                    ticks,
                    finished_at: t,
                })
            }
        }
    }
    anyhow::bail!("tick timer stopped before playback finished")
}

pub async fn run_play(scenario_path: &str, speed: f64) -> anyhow::Result<()> {
    let summary = play_scenario(Scenario::load(scenario_path)?, speed).await?;
    info!(
        "playback finished at {} after {} tick(s)",
        summary.finished_at.to_rfc3339(),
        summary.ticks
    );
    Ok(())
}
