#![cfg(windows)]

/// Ctrl+C handling via `SetConsoleCtrlHandler`.
pub mod ctrl_c;

/// Daemon main loop.
pub mod daemon;

/// WinEvent code translation.
pub mod event;

/// DWM frame bounds and cloaking.
pub mod frame;

/// WinEvent hook thread.
pub mod hook;

/// Single-instance named mutex.
pub mod instance;

/// Layered border window and DPI awareness.
pub mod overlay;

/// `WindowQuery` over live Win32 windows.
pub mod query;

pub use daemon::DaemonOptions;
pub use hook::WinEventSource;
pub use instance::InstanceGuard;
pub use overlay::BorderOverlay;
pub use query::Win32Query;
