//! List scenarios in a content directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use kinetic_content::ContentFactory;

use super::default_data_dir;

/// List available scenarios
#[derive(Parser, Debug)]
pub struct List {
    /// Content directory (defaults to the bundled data)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl List {
    pub fn execute(self) -> Result<()> {
        let factory = ContentFactory::new(self.data_dir.unwrap_or_else(default_data_dir));
        for name in factory.scenario_names()? {
            let scenario = factory.load_scenario(&name)?;
            println!("{:<20} {:>5} ticks  {}", name, scenario.ticks, scenario.profile);
        }
        Ok(())
    }
}
