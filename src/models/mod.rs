// Domain records produced by the parsers and the collector

mod dataset;
mod pool;
mod scan;
mod scrape;
mod service;

pub use dataset::{Dataset, DatasetKind};
pub use pool::{Pool, PoolHealth};
pub use scan::ScanStatus;
pub use scrape::{Scrape, ScrapeReport, Snapshot, Source, SourceWarning};
pub use service::ServiceStatus;
