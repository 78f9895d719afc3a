//! Ctrl+C signal handler using `SetConsoleCtrlHandler`.
//!
//! Posts `BorderEvent::Shutdown` into the consumer channel so the
//! daemon loop exits through its normal cleanup path.

use std::sync::OnceLock;

use halo_core::event::{self, EventSender};
use halo_core::{BorderEvent, Error, Result};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};

/// Global sender, written once by `set_handler`, read by the callback.
static SENDER: OnceLock<EventSender> = OnceLock::new();

/// Registers a Ctrl+C / Ctrl+Break handler that posts `Shutdown`.
pub fn set_handler(tx: EventSender) -> Result<()> {
    SENDER
        .set(tx)
        .map_err(|_| Error::platform("SetConsoleCtrlHandler", "handler already registered"))?;
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }
        .map_err(|e| Error::platform("SetConsoleCtrlHandler", e))
}

unsafe extern "system" fn handler(ctrl_type: u32) -> windows::core::BOOL {
    if (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT)
        && let Some(tx) = SENDER.get()
    {
        event::post(tx, BorderEvent::Shutdown);
        return windows::core::BOOL(1);
    }
    windows::core::BOOL(0)
}
