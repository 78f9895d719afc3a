use crate::commands::GlobalOptions;

/// Resolves the current foreground window and explains the border
/// decision for it.
#[cfg(windows)]
pub fn execute(options: &GlobalOptions) {
    use halo_core::WindowQuery;
    use halo_windows::Win32Query;

    let config = match halo_windows::daemon::prepare(&options.daemon()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    halo_windows::overlay::enable_dpi_awareness();
    let query = Win32Query;
    let Some(handle) = query.foreground() else {
        println!("No foreground window.");
        return;
    };
    let Some(snapshot) = query.resolve(handle) else {
        println!("Foreground window 0x{handle:X} closed before it could be read.");
        return;
    };

    println!("{snapshot}");
    println!("  can have border: {}", snapshot.can_have_border());
    println!("  ready:           {}", query.is_ready(handle));
    println!("  cloaked:         {:?}", query.is_cloaked(handle));
    println!("  verdict:         {}", super::verdict(&snapshot, &config));
}

#[cfg(not(windows))]
pub fn execute(_options: &GlobalOptions) {
    crate::commands::unsupported();
}
