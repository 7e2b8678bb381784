mod list;
mod run;

pub use list::List;
pub use run::Run;

use std::path::PathBuf;

/// Content shipped with the harness.
pub(crate) fn default_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
