//! Command implementations for the wxmap CLI.
//!
//! Every command reads a scenario file, replays its drawn shapes through the
//! drawing state machine and fetches synthetic weather for the regions.

use clap::Subcommand;

pub mod export;
pub mod play;
pub mod scenario;
pub mod simulate;

#[derive(Subcommand)]
pub enum Command {
    /// Write the color of every region for every hour of the range as CSV
    Simulate {
        /// Scenario TOML file
        #[arg(short = 's', long)]
        scenario: String,

        /// Output path for the color CSV
        #[arg(short = 'o', long)]
        output: String,

        /// Also write the map frame at range start as JSON
        #[arg(long)]
        frame: Option<String>,
    },

    /// Play the scenario's time range in real time, logging region colors
    Play {
        /// Scenario TOML file
        #[arg(short = 's', long)]
        scenario: String,

        /// Playback speed multiplier (0.5, 1, 2 or 4)
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },

    /// Write the dashboard export snapshot for a scenario
    Export {
        /// Scenario TOML file
        #[arg(short = 's', long)]
        scenario: String,

        /// Output path for the snapshot JSON
        #[arg(short = 'o', long)]
        output: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Simulate {
            scenario,
            output,
            frame,
        } => simulate::run_simulate(&scenario, &output, frame.as_deref()).await,
        Command::Play { scenario, speed } => play::run_play(&scenario, speed).await,
        Command::Export { scenario, output } => export::run_export(&scenario, &output).await,
    }
}
