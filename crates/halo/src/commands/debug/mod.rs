pub mod events;
pub mod foreground;

#[cfg(windows)]
use halo_core::WindowSnapshot;
#[cfg(windows)]
use halo_core::config::{Config, is_excluded};

/// Short verdict on what the border does with a window.
#[cfg(windows)]
fn verdict(snapshot: &WindowSnapshot, config: &Config) -> &'static str {
    if is_excluded(snapshot, &config.window.exclusions) {
        "excluded"
    } else if snapshot.can_have_border() {
        "border"
    } else {
        "no border"
    }
}
