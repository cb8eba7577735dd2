//! Process Configuration
//!
//! Command-line options and the resolved configuration each operating mode runs with.
//! The router and worker cores only ever see `RouterConfig` / `WorkerConfig`.

use crate::storage::protocol::ENDPOINT_MESSAGES;

use std::path::PathBuf;

/// Records between progress log lines unless overridden.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Read the input file and route its requests to the workers.
    #[value(alias = "R")]
    Router,
    /// Serve one bucket's object store.
    #[value(alias = "W")]
    Worker,
}

#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Operating mode
    #[clap(long = "type", value_enum, default_value = "router")]
    pub mode: Mode,

    /// Number of workers (buckets)
    #[clap(short = 'n', long = "num", default_value_t = 1)]
    pub num: usize,

    /// Input record file, one `request_id,action,object_id[,size,hash]` per line
    #[clap(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Base port; worker `i` listens on `port + i`
    #[clap(long, default_value_t = 5555)]
    pub port: u16,

    /// Host workers are reached on (router) or bind to (worker)
    #[clap(long, default_value = "localhost")]
    pub host: String,

    /// Worker identifier echoed in write acknowledgements
    #[clap(long, default_value = "0")]
    pub id: String,

    /// Requests accumulated before a flush
    #[clap(long = "batch-size", default_value_t = 10_000)]
    pub batch_size: usize,

    /// Log progress every N records
    #[clap(long = "progress-every", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    #[error("router mode requires an input file (--file)")]
    MissingInput,
    #[error("port range {base}+{count} exceeds 65535")]
    PortOverflow { base: u16, count: usize },
}

/// Fully resolved router configuration.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Batch endpoint of every worker, indexed by bucket id.
    pub worker_urls: Vec<String>,
    pub batch_size: usize,
    pub progress_interval: u64,
}

impl RouterConfig {
    pub fn new(worker_urls: Vec<String>, batch_size: usize) -> Result<Self, ConfigError> {
        if worker_urls.is_empty() {
            return Err(ConfigError::NoWorkers);
        }
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(Self {
            worker_urls,
            batch_size,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.worker_urls.len()
    }
}

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    pub bind_addr: String,
    pub worker_id: String,
}

impl Options {
    /// Resolves the router configuration and the input path it reads.
    pub fn router_config(&self) -> Result<(RouterConfig, PathBuf), ConfigError> {
        if self.num == 0 {
            return Err(ConfigError::NoWorkers);
        }
        let file = self.file.clone().ok_or(ConfigError::MissingInput)?;

        let last = self.port as usize + self.num - 1;
        if last > u16::MAX as usize {
            return Err(ConfigError::PortOverflow {
                base: self.port,
                count: self.num,
            });
        }

        let worker_urls = (0..self.num)
            .map(|i| {
                format!(
                    "http://{}:{}{}",
                    self.host,
                    self.port as usize + i,
                    ENDPOINT_MESSAGES
                )
            })
            .collect();

        let mut config = RouterConfig::new(worker_urls, self.batch_size)?;
        config.progress_interval = self.progress_interval.max(1);
        Ok((config, file))
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            worker_id: self.id.clone(),
        }
    }
}
