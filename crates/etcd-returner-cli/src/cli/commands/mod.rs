pub mod dispatch;
pub mod jobs;
pub mod write;

pub use dispatch::dispatch;

use anyhow::{Context, Result};
use etcd_returner::opts::{READ_PROFILE, RETURNER_PROFILE, WRITE_PROFILE};
use etcd_returner::{EtcdReturner, Opts};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use super::args::CommonArgs;

/// Host configuration plus the returner built from it.
pub struct Session {
    pub opts: Opts,
    pub returner: EtcdReturner,
}

impl Session {
    pub fn open(common: &CommonArgs) -> Result<Self> {
        let mut opts = Opts::from_path(&common.config)
            .with_context(|| format!("failed to load config {}", common.config.display()))?;
        if let Some(profile) = &common.profile {
            for key in [RETURNER_PROFILE, READ_PROFILE, WRITE_PROFILE] {
                opts.set(key, profile.as_str());
            }
        }
        let returner = EtcdReturner::load()?;
        tracing::debug!(config = %common.config.display(), "session opened");
        Ok(Self { opts, returner })
    }
}

/// Read a JSON document from a file, or stdin for `-`.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
