use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use zooscape_system_decision::Tuning;

const SUPPORTED_TUNING_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct TuningFile {
    version: u32,
    #[serde(flatten)]
    tuning: Tuning,
}

/// Reads a versioned tuning file from disk.
pub(crate) fn load(path: &Path) -> Result<Tuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid tuning file {}", path.display()))
}

fn parse(contents: &str) -> Result<Tuning> {
    let file: TuningFile =
        toml::from_str(contents).context("failed to parse tuning toml contents")?;
    if file.version != SUPPORTED_TUNING_VERSION {
        bail!(
            "unsupported tuning version {}; expected {}",
            file.version,
            SUPPORTED_TUNING_VERSION
        );
    }
    Ok(file.tuning)
}
