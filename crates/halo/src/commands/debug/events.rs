use crate::commands::GlobalOptions;

/// Prints every published window transition. Press Ctrl+C to stop.
#[cfg(windows)]
pub fn execute(options: &GlobalOptions) {
    println!("Watching focused-window transitions (press Ctrl+C to stop)...\n");

    let result = halo_windows::daemon::watch_events(&options.daemon(), |snapshot, config| {
        match snapshot {
            Some(snapshot) => println!("{snapshot} => {}", super::verdict(snapshot, config)),
            None => println!("(no window) => hide"),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
pub fn execute(_options: &GlobalOptions) {
    crate::commands::unsupported();
}
