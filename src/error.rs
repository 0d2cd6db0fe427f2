// Error types for command execution, output parsing and per-source fetches

use crate::models::Source;

/// Failure to obtain usable output from an external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The binary could not be started at all.
    #[error("command {program:?} could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully. `stdout` is kept: some tools
    /// (e.g. `systemctl is-active`) still print a meaningful token on failure.
    #[error("command {program:?} exited with {}: {stderr}", exit_label(.code))]
    Exit {
        program: String,
        code: Option<i32>,
        stdout: Vec<u8>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "signal".to_string(),
    }
}

impl CommandError {
    /// Stdout captured before the failure, if any.
    pub fn stdout(&self) -> &[u8] {
        match self {
            CommandError::Spawn { .. } => &[],
            CommandError::Exit { stdout, .. } => stdout,
        }
    }
}

/// Output was obtained but does not match the expected column contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} fields, got {got}: {line:?}")]
    FieldCount {
        expected: usize,
        got: usize,
        line: String,
    },

    #[error("invalid {field} {value:?} for {name:?}: {reason}")]
    InvalidField {
        name: String,
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// A failed fetch, attributed to exactly one data source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("zpool list failed: {0}")]
    PoolCommand(#[source] CommandError),

    #[error("failed to parse pool output: {0}")]
    PoolParse(#[source] ParseError),

    #[error("zfs list failed: {0}")]
    DatasetCommand(#[source] CommandError),

    #[error("failed to parse dataset output: {0}")]
    DatasetParse(#[source] ParseError),

    #[error("zpool status failed: {0}")]
    ScanCommand(#[source] CommandError),

    #[error("{} fetch did not finish before the scrape deadline", .0.as_str())]
    DeadlineExceeded(Source),
}

impl FetchError {
    /// The data source this failure belongs to.
    pub fn source_kind(&self) -> Source {
        match self {
            FetchError::PoolCommand(_) | FetchError::PoolParse(_) => Source::Pools,
            FetchError::DatasetCommand(_) | FetchError::DatasetParse(_) => Source::Datasets,
            FetchError::ScanCommand(_) => Source::ScanStatuses,
            FetchError::DeadlineExceeded(source) => *source,
        }
    }
}
