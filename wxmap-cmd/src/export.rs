//! Write a scenario's export snapshot, the same JSON the dashboard
//! downloads.

use crate::scenario::Scenario;
use crate::simulate::Replay;
use anyhow::Context;
use log::info;
use wxmap_core::export::ExportSnapshot;

/// Snapshot JSON with the clock at range start.
pub fn snapshot_json(replay: &Replay) -> anyhow::Result<String> {
    let snapshot = ExportSnapshot::new(
        replay.regions.as_slice(),
        replay.sources(),
        replay.range,
        replay.range.start,
        &replay.cache,
    );
    Ok(snapshot.to_json_pretty()?)
}

pub async fn run_export(scenario_path: &str, output_json: &str) -> anyhow::Result<()> {
    let replay = Replay::prepare(Scenario::load(scenario_path)?).await?;
    let json = snapshot_json(&replay)?;
    std::fs::write(output_json, json).with_context(|| format!("writing {}", output_json))?;
    info!(
        "exported {} region(s) to {}",
        replay.regions.len(),
        output_json
    );
    Ok(())
}
