//! Job id generation.
//!
//! A jid is the timestamp of the job's creation with microsecond precision,
//! `YYYYMMDDhhmmssffffff`, optionally suffixed with `_<pid>` when the host
//! runs several masters that could mint ids in the same microsecond.

use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDateTime, Utc};

use crate::opts::{Opts, UNIQUE_JID, UTC_JID};

const JID_FORMAT: &str = "%Y%m%d%H%M%S%6f";
const JID_LEN: usize = 20;

/// Source of new job ids.
pub trait JidGenerator: Send + Sync {
    fn gen_jid(&self, opts: &Opts) -> String;
}

/// Timestamp based generator. Ids from one generator are strictly increasing.
#[derive(Debug, Default)]
pub struct TimestampJidGenerator {
    last: Mutex<Option<NaiveDateTime>>,
}

impl TimestampJidGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_timestamp(&self, now: NaiveDateTime) -> NaiveDateTime {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}

impl JidGenerator for TimestampJidGenerator {
    fn gen_jid(&self, opts: &Opts) -> String {
        let now = if opts.get_bool(UTC_JID) {
            Utc::now().naive_utc()
        } else {
            Local::now().naive_local()
        };
        let jid = self.next_timestamp(now).format(JID_FORMAT).to_string();
        if opts.get_bool(UNIQUE_JID) {
            format!("{}_{}", jid, std::process::id())
        } else {
            jid
        }
    }
}

/// Whether `jid` looks like a generated job id.
pub fn is_jid(jid: &str) -> bool {
    let stamp = jid.split_once('_').map_or(jid, |(stamp, _)| stamp);
    stamp.len() == JID_LEN && stamp.bytes().all(|b| b.is_ascii_digit())
}

/// Render the timestamp encoded in a jid, e.g. `2026, Jan 02 03:04:05.000006`.
pub fn jid_to_time(jid: &str) -> Option<String> {
    if !is_jid(jid) {
        return None;
    }
    let stamp = &jid[..JID_LEN];
    let parsed = NaiveDateTime::parse_from_str(stamp, JID_FORMAT).ok()?;
    Some(parsed.format("%Y, %b %d %H:%M:%S%.6f").to_string())
}
