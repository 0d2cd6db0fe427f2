// Shared test helpers: a CommandRunner that answers from fixtures

#![allow(dead_code)]

use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zfs_exporter::error::CommandError;
use zfs_exporter::runner::CommandRunner;

pub const POOL_LIST: &str = "tank\t10737418240\t5368709120\t5368709120\t33\t1.00\tONLINE\toff\n";

pub const DATASET_LIST: &str = "tank\t5368709120\t5368709120\t262144\tfilesystem\toff\toff\n\
                                tank/media\t4294967296\t5368709120\t4294967296\tfilesystem\ton\toff\n";

pub const STATUS_SCRUBBING: &str = "  pool: tank
 state: ONLINE
  scan: scrub in progress since Sun Jan 12 00:24:01 2025
\t1.23T scanned at 456M/s, 1.10T issued at 400M/s, 2.28T total
\t0B repaired, 48.36% done, 00:51:10 to go
config:

\tNAME        STATE     READ WRITE CKSUM
\ttank        ONLINE       0     0     0

errors: No known data errors
";

/// Canned answer for one command.
#[derive(Clone)]
pub enum Reply {
    Ok(String),
    /// Non-zero exit with this stdout.
    Exit(i32, String),
    /// Binary could not be started.
    Spawn,
    /// Never answers before the given delay.
    Hang(Duration),
}

/// Dispatches on the command line. `zpool list`, `zfs list` and `zpool status`
/// are matched by subcommand; systemctl calls by their full argument list
/// (e.g. `show --property=LoadState nfs.service`).
#[derive(Default)]
pub struct FixtureRunner {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl FixtureRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, reply: Reply) -> Self {
        self.replies.insert(key.to_string(), reply);
        self
    }

    pub fn pools(self, reply: Reply) -> Self {
        self.with("zpool list", reply)
    }

    pub fn datasets(self, reply: Reply) -> Self {
        self.with("zfs list", reply)
    }

    pub fn status(self, reply: Reply) -> Self {
        self.with("zpool status", reply)
    }

    /// A unit that exists and reports `state` from `is-active`
    /// (exit 0 for "active", 3 otherwise, as systemctl does).
    pub fn unit(self, unit: &str, state: &str) -> Self {
        let active = if state == "active" {
            Reply::Ok(format!("{state}\n"))
        } else {
            Reply::Exit(3, format!("{state}\n"))
        };
        self.with(
            &format!("systemctl show --property=LoadState {unit}"),
            Reply::Ok("LoadState=loaded\n".into()),
        )
        .with(&format!("systemctl is-active {unit}"), active)
    }

    /// A unit systemd has never heard of.
    pub fn missing_unit(self, unit: &str) -> Self {
        self.with(
            &format!("systemctl show --property=LoadState {unit}"),
            Reply::Ok("LoadState=not-found\n".into()),
        )
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every command line seen so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn key_for(program: &str, args: &[&str]) -> String {
        let name = program.rsplit('/').next().unwrap_or(program);
        match (name, args.first()) {
            ("zpool", Some(&"list")) => "zpool list".into(),
            ("zpool", Some(&"status")) => "zpool status".into(),
            ("zfs", Some(&"list")) => "zfs list".into(),
            _ => format!("{} {}", name, args.join(" ")),
        }
    }
}

impl CommandRunner for FixtureRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [&'a str],
    ) -> BoxFuture<'a, Result<Vec<u8>, CommandError>> {
        let line = format!("{} {}", program, args.join(" "));
        self.calls.lock().unwrap().push(line);
        let reply = self.replies.get(&Self::key_for(program, args)).cloned();
        Box::pin(async move {
            match reply {
                Some(Reply::Ok(out)) => Ok(out.into_bytes()),
                Some(Reply::Exit(code, out)) => Err(CommandError::Exit {
                    program: program.to_string(),
                    code: Some(code),
                    stdout: out.into_bytes(),
                    stderr: String::new(),
                }),
                Some(Reply::Hang(delay)) => {
                    tokio::time::sleep(delay).await;
                    Ok(Vec::new())
                }
                Some(Reply::Spawn) | None => Err(CommandError::Spawn {
                    program: program.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                }),
            }
        })
    }
}
