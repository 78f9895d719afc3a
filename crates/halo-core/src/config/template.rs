/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `halo init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# halo configuration
# Location: ~/.config/halo/config.toml

[border]
# Border color as "#RRGGBB" or "#AARRGGBB".
color = "#FFA500"
# Border width in pixels at 100% scaling. Scaled with the window's DPI.
width = 4
# Pixels the border extends past the window edge (negative draws inside).
offset = 0

[window]
# How often (ms) the bordered window is checked to still be in front.
validation_interval_ms = 250
# How often (ms) to poll a window that is still animating in.
readiness_interval_ms = 30
# Give up on a window that has not appeared after this many ms.
readiness_timeout_ms = 700

# Windows that never get a border. Each rule matches on the exact
# class name and/or title, ignoring case. Setting this replaces the
# built-in list below.
# exclusions = [
#   { class_name = "Windows.UI.Core.CoreWindow" },
#   { class_name = "Shell_TrayWnd" },
#   { class_name = "TopLevelWindowForOverflowXamlIsland" },
#   { class_name = "XamlExplorerHostIslandWindow" },
#   { class_name = "ForegroundStaging" },
#   { class_name = "Progman" },
#   { class_name = "WorkerW" },
# ]

[throttle]
# Window changes closer together than this (ms) count as a drag/resize.
rapid_threshold_ms = 200
# Quiet time (ms) after a drag/resize before the border comes back.
quiet_delay_ms = 150

[logging]
# Enable file logging to ~/.config/halo/logs/halo.log.
enabled = true
# Minimum log level: "trace", "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
