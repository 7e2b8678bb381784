//! Run scenarios and print a summary per run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use kinetic_content::ContentFactory;
use kinetic_sim::RunSummary;

use super::default_data_dir;

/// Run one scenario, or every scenario with --all
#[derive(Parser, Debug)]
pub struct Run {
    /// Scenario name (file stem under scenarios/)
    #[arg(required_unless_present = "all")]
    pub scenario: Option<String>,

    /// Run every scenario in the content directory
    #[arg(long, conflicts_with = "scenario")]
    pub all: bool,

    /// Content directory (defaults to the bundled data)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Print every tick sample
    #[arg(long)]
    pub samples: bool,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let factory = ContentFactory::new(self.data_dir.unwrap_or_else(default_data_dir));
        let names = match self.scenario {
            Some(name) => vec![name],
            None => factory.scenario_names()?,
        };

        for name in names {
            let summary = kinetic_sim::prepare(&factory, &name)?.run();
            print_summary(&summary, self.samples);
        }
        Ok(())
    }
}

fn print_summary(summary: &RunSummary, samples: bool) {
    println!("== {} ({}) ==", summary.scenario, summary.character);
    if samples {
        for sample in &summary.samples {
            println!(
                "  {:>6}  pos ({:>8.3}, {:>8.3})  vel ({:>8.3}, {:>8.3})  {}{}",
                sample.tick.to_string(),
                sample.position.x,
                sample.position.y,
                sample.velocity.x,
                sample.velocity.y,
                if sample.grounded { "grounded" } else { "airborne" },
                if sample.invulnerable { " i-frames" } else { "" },
            );
        }
    }
    for (tick, event) in &summary.attack_events {
        println!("  {}  {:?}", tick, event);
    }
    if let Some(last) = summary.final_sample() {
        println!(
            "  final pos ({:.3}, {:.3}) speed {:.3} {}",
            last.position.x,
            last.position.y,
            last.velocity.length(),
            if last.grounded { "grounded" } else { "airborne" },
        );
    }
    println!(
        "  ticks {}  jumps {}  landings {}  max speed {:.3}  rejected {}  pristine {}",
        summary.ticks,
        summary.jumps,
        summary.landings,
        summary.max_speed(),
        summary.rejected_commands,
        summary.pristine_after_shutdown,
    );
}
