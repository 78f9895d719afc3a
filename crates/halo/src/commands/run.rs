use super::GlobalOptions;

/// Runs the border daemon until Ctrl+C.
#[cfg(windows)]
pub fn execute(options: &GlobalOptions) {
    eprintln!("halo started. Press Ctrl+C to stop.");
    if let Err(e) = halo_windows::daemon::run(&options.daemon()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
pub fn execute(_options: &GlobalOptions) {
    super::unsupported();
}
