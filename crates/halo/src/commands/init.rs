use std::path::Path;

use halo_core::config;

/// Creates the default configuration file.
///
/// Writes to `path` when given, otherwise to `~/.config/halo/config.toml`.
/// An existing file is never overwritten.
pub fn execute(path: Option<&Path>) {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config::config_path() {
            Some(path) => path,
            None => {
                eprintln!("Error: could not determine home directory.");
                std::process::exit(1);
            }
        },
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error: could not create {}: {e}", dir.display());
            std::process::exit(1);
        }
    }

    if path.exists() {
        println!("Already exists: {}", path.display());
        return;
    }

    match std::fs::write(&path, config::template::generate_config()) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => {
            eprintln!("Error: could not write {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
