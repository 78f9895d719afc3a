pub mod debug;
pub mod init;
pub mod run;

use std::path::PathBuf;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub logs: Option<PathBuf>,
    pub no_logs: bool,
}

#[cfg(windows)]
impl GlobalOptions {
    pub fn daemon(&self) -> halo_windows::DaemonOptions {
        halo_windows::DaemonOptions {
            config: self.config.clone(),
            logs: self.logs.clone(),
            no_logs: self.no_logs,
        }
    }
}

/// Exits with an error on platforms without a border implementation.
#[cfg(not(windows))]
pub fn unsupported() -> ! {
    eprintln!("Error: halo only runs on Windows.");
    std::process::exit(1);
}
