//! `etcd-returner return` and `etcd-returner save-load`.

use anyhow::{Context, Result};
use etcd_returner::{JobReturn, Returner};
use tracing::info;

use super::super::args::{ReturnArgs, SaveLoadArgs};
use super::{read_json, Session};
use crate::exit_codes::SUCCESS;

pub async fn cmd_return(session: &Session, args: ReturnArgs) -> Result<i32> {
    let value = read_json(&args.file)?;
    let ret = JobReturn::from_value(value).context("invalid job return")?;
    session
        .returner
        .returner(&session.opts, &ret)
        .await
        .with_context(|| format!("failed to store return for job {}", ret.jid()))?;
    info!(minion = %ret.id(), jid = %ret.jid(), "stored job return");
    Ok(SUCCESS)
}

pub async fn cmd_save_load(session: &Session, args: SaveLoadArgs) -> Result<i32> {
    let load = read_json(&args.file)?;
    session
        .returner
        .save_load(&session.opts, &args.jid, &load, None)
        .await
        .with_context(|| format!("failed to store load for job {}", args.jid))?;
    info!(jid = %args.jid, "stored job load");
    Ok(SUCCESS)
}
