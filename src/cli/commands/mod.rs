//! Command implementations for the nergen CLI.
//!
//! Each command has its own module/file.

pub mod bootstrap;
pub mod compose;
pub mod generate;
pub mod reconcile;
pub mod split;
pub mod stats;

pub use bootstrap::BootstrapArgs;
pub use compose::ComposeArgs;
pub use generate::GenerateArgs;
pub use reconcile::ReconcileArgs;
pub use split::SplitArgs;
pub use stats::StatsArgs;

use crate::config::PipelineConfig;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the pipeline config and build the run-wide generator from it.
/// A `--seed` flag takes precedence over the config file.
pub(crate) fn setup(
    config_path: Option<&PathBuf>,
    seed_override: Option<u64>,
) -> Result<(PipelineConfig, StdRng)> {
    let mut config = PipelineConfig::load(config_path.map(PathBuf::as_path))?;
    if let Some(seed) = seed_override {
        config.seed = seed;
    }
    let rng = StdRng::seed_from_u64(config.seed);
    Ok((config, rng))
}

pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
