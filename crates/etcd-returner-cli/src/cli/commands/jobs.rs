//! Read-side commands: loads, returns, job and minion listings.

use anyhow::{Context, Result};
use etcd_returner::{jid_to_time, Returner};

use super::super::args::{GetFunArgs, JidArgs, JidsArgs, ListFormat, PrepJidArgs};
use super::{print_json, Session};
use crate::exit_codes::SUCCESS;

pub async fn cmd_get_load(session: &Session, args: JidArgs) -> Result<i32> {
    let load = session
        .returner
        .get_load(&session.opts, &args.jid)
        .await
        .with_context(|| format!("failed to read load for job {}", args.jid))?;
    print_json(&load)?;
    Ok(SUCCESS)
}

pub async fn cmd_get_jid(session: &Session, args: JidArgs) -> Result<i32> {
    let returns = session
        .returner
        .get_jid(&session.opts, &args.jid)
        .await
        .with_context(|| format!("failed to read returns for job {}", args.jid))?;
    print_json(&returns)?;
    Ok(SUCCESS)
}

pub async fn cmd_get_fun(session: &Session, args: GetFunArgs) -> Result<i32> {
    let matches = session
        .returner
        .get_fun(&session.opts, &args.fun)
        .await
        .with_context(|| format!("failed to look up minions for {}", args.fun))?;
    print_json(&matches)?;
    Ok(SUCCESS)
}

pub async fn cmd_jids(session: &Session, args: JidsArgs) -> Result<i32> {
    let mut jids = session
        .returner
        .get_jids(&session.opts)
        .await
        .context("failed to list jobs")?;
    jids.sort();
    print!("{}", render_jids(&jids, args.format)?);
    Ok(SUCCESS)
}

pub async fn cmd_minions(session: &Session) -> Result<i32> {
    let mut minions = session
        .returner
        .get_minions(&session.opts)
        .await
        .context("failed to list minions")?;
    minions.sort();
    for minion in &minions {
        println!("{}", minion);
    }
    Ok(SUCCESS)
}

pub fn cmd_prep_jid(session: &Session, args: PrepJidArgs) -> i32 {
    let jid = session
        .returner
        .prep_jid(&session.opts, args.nocache, args.jid.as_deref());
    println!("{}", jid);
    SUCCESS
}

fn render_jids(jids: &[String], format: ListFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        ListFormat::Plain => {
            for jid in jids {
                out.push_str(jid);
                out.push('\n');
            }
        }
        ListFormat::Json => {
            out.push_str(&serde_json::to_string_pretty(jids)?);
            out.push('\n');
        }
        ListFormat::Table => {
            if jids.is_empty() {
                out.push_str("No jobs found.\n");
                return Ok(out);
            }
            let width = jids.iter().map(String::len).max().unwrap_or(0).max(3);
            out.push_str(&format!("{:<width$}  STARTED\n", "JID"));
            for jid in jids {
                let started = jid_to_time(jid).unwrap_or_else(|| "-".to_string());
                out.push_str(&format!("{:<width$}  {}\n", jid, started));
            }
            out.push_str(&format!("\nTotal: {} job(s)\n", jids.len()));
        }
    }
    Ok(out)
}
