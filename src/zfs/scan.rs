// Parse `zpool status` into one scan record per pool.
//
// The report is free text: each pool starts with a "pool: NAME" header,
// followed somewhere by a "scan:" line and, for a running scan, a later line
// with "NN.NN% done". The parser is a small state machine fed one line at a
// time; it never fails, an unrecognised section just yields an idle record.

use crate::models::ScanStatus;
use regex::Regex;
use std::sync::LazyLock;

static POOL_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*pool:\s+(\S+)").expect("valid pool header regex"));

static ACTIVE_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*scan:\s+(scrub|resilver) in progress").expect("valid active scan regex")
});

static PROGRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)%\s+done").expect("valid progress regex"));

/// Where the parser is within the report.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState {
    /// Before the first pool header.
    Seeking,
    /// Inside a pool section, no scan line seen yet.
    InSection { pool: String },
    /// The pool's record has been emitted. While `awaiting_progress` is set
    /// the next "% done" figure updates that record.
    Resolved { pool: String, awaiting_progress: bool },
}

/// Line-at-a-time scan status parser.
#[derive(Debug)]
pub struct ScanParser {
    state: SectionState,
    statuses: Vec<ScanStatus>,
}

impl Default for ScanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanParser {
    pub fn new() -> Self {
        Self {
            state: SectionState::Seeking,
            statuses: Vec::new(),
        }
    }

    pub fn state(&self) -> &SectionState {
        &self.state
    }

    pub fn statuses(&self) -> &[ScanStatus] {
        &self.statuses
    }

    /// Applies one line of input.
    pub fn step(&mut self, line: &str) {
        if let Some(caps) = POOL_HEADER.captures(line) {
            self.close_section();
            self.state = SectionState::InSection {
                pool: caps[1].to_string(),
            };
            return;
        }

        match &mut self.state {
            SectionState::Seeking => {}
            SectionState::InSection { pool } => {
                let pool = std::mem::take(pool);
                if let Some(caps) = ACTIVE_SCAN.captures(line) {
                    let mut status = ScanStatus::idle(pool.clone());
                    match &caps[1] {
                        "scrub" => status.scrub = true,
                        _ => status.resilver = true,
                    }
                    self.statuses.push(status);
                    self.state = SectionState::Resolved {
                        pool,
                        awaiting_progress: true,
                    };
                } else if line.contains("scan:") {
                    self.statuses.push(ScanStatus::idle(pool.clone()));
                    self.state = SectionState::Resolved {
                        pool,
                        awaiting_progress: false,
                    };
                } else {
                    self.state = SectionState::InSection { pool };
                }
            }
            SectionState::Resolved {
                awaiting_progress, ..
            } => {
                if !*awaiting_progress {
                    return;
                }
                let Some(pct) = PROGRESS
                    .captures(line)
                    .and_then(|caps| caps[1].parse::<f64>().ok())
                else {
                    return;
                };
                if let Some(last) = self.statuses.last_mut() {
                    last.progress = pct / 100.0;
                }
                *awaiting_progress = false;
            }
        }
    }

    /// Closes the last section and returns every record.
    pub fn finish(mut self) -> Vec<ScanStatus> {
        self.close_section();
        self.statuses
    }

    /// A section left without a scan line still gets its idle record.
    fn close_section(&mut self) {
        if let SectionState::InSection { pool } = &mut self.state {
            self.statuses.push(ScanStatus::idle(std::mem::take(pool)));
        }
        self.state = SectionState::Seeking;
    }
}

/// Parses a full `zpool status` report.
pub fn parse_scan_statuses(data: &[u8]) -> Vec<ScanStatus> {
    let text = String::from_utf8_lossy(data);
    let mut parser = ScanParser::new();
    for line in text.lines() {
        parser.step(line);
    }
    parser.finish()
}
