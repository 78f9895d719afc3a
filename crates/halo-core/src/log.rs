//! Tracing setup with an optional size-rotated log file.
//!
//! Logs go to stderr and, when enabled, to `~/.config/halo/logs/halo.log`.
//! When the file exceeds the configured max size, it is rotated to
//! `halo.log.1` (one backup kept).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};

const LOG_FILE_NAME: &str = "halo.log";
const BACKUP_SUFFIX: &str = ".1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `true`.
    pub enabled: bool,
    /// Minimum log level: "trace", "debug", "info", "warn", or "error".
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
    /// Log directory. Defaults to `~/.config/halo/logs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".into(),
            max_file_mb: 10,
            directory: None,
        }
    }
}

impl LogConfig {
    /// Directory the log file is written to, if one can be determined.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| crate::config::config_dir().map(|d| d.join("logs")))
    }

    /// Rotation threshold in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_file_mb.saturating_mul(1024 * 1024)
    }
}

/// Installs the global tracing subscriber. Call once at startup.
///
/// Returns the log file path when file logging is active.
pub fn init(config: &LogConfig) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Logging(e.to_string()))?;

    let file = if config.enabled {
        let dir = config
            .log_dir()
            .ok_or_else(|| Error::Logging("could not determine log directory".into()))?;
        Some(RotatingFile::open(&dir, config.max_bytes())?)
    } else {
        None
    };
    let path = file.as_ref().map(RotatingFile::path);

    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(move || file.clone())
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(path)
}

struct Inner {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

/// Append-only log file that rotates to a single `.1` backup.
///
/// Clones share the same file handle.
#[derive(Clone)]
pub struct RotatingFile {
    inner: Arc<Mutex<Inner>>,
}

impl RotatingFile {
    /// Opens (or creates) `halo.log` inside `dir`.
    pub fn open(dir: &Path, max_bytes: u64) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                file,
                path,
                max_bytes,
                written,
            })),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.inner.lock().path.clone()
    }
}

impl Inner {
    fn rotate(&mut self) -> io::Result<()> {
        let backup = backup_path(&self.path);
        let _ = fs::remove_file(&backup);
        fs::rename(&self.path, &backup)?;
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        if inner.written > 0 && inner.written + buf.len() as u64 > inner.max_bytes {
            inner.rotate()?;
        }
        inner.file.write_all(buf)?;
        inner.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().file.flush()
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}
