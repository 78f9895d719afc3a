use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use halo_core::config::{self, Config};
use halo_core::event::{self, EventReceiver};
use halo_core::{
    BorderCoordinator, BorderEvent, BorderStyle, Error, Flow, Monitor, Overlay, Result,
    WindowQuery, WindowSnapshot,
};
use tracing::info;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage,
};

use crate::ctrl_c;
use crate::hook::WinEventSource;
use crate::instance::InstanceGuard;
use crate::overlay::{BorderOverlay, enable_dpi_awareness};
use crate::query::Win32Query;

/// How long the consumer waits for an event before pumping window
/// messages again. About one frame.
const PUMP_INTERVAL: Duration = Duration::from_millis(16);

/// Command-line overrides for a daemon run.
#[derive(Debug, Clone, Default)]
pub struct DaemonOptions {
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Log directory override. Must exist.
    pub logs: Option<PathBuf>,
    /// Disable file logging.
    pub no_logs: bool,
}

/// Loads config and applies the logging overrides.
pub fn prepare(options: &DaemonOptions) -> Result<Config> {
    let mut config = config::load(options.config.as_deref())?;
    if let Some(dir) = &options.logs {
        if !dir.is_dir() {
            return Err(Error::Logging(format!(
                "log directory {} does not exist",
                dir.display()
            )));
        }
        config.logging.directory = Some(dir.clone());
        config.logging.enabled = true;
    }
    if options.no_logs {
        config.logging.enabled = false;
    }
    Ok(config)
}

/// Runs the border daemon until Ctrl+C.
///
/// The hook thread and the validator post into one channel; this thread
/// consumes it and owns the overlay.
pub fn run(options: &DaemonOptions) -> Result<()> {
    let config = prepare(options)?;
    if let Some(path) = halo_core::log::init(&config.logging)? {
        info!("logging to {}", path.display());
    }
    let _instance = InstanceGuard::acquire()?;
    enable_dpi_awareness();

    let overlay = BorderOverlay::new(BorderStyle::from_config(&config.border))?;
    let (tx, rx) = event::channel();
    ctrl_c::set_handler(tx.clone())?;

    let query: Arc<dyn WindowQuery> = Arc::new(Win32Query);
    let mut coordinator = BorderCoordinator::new(overlay, Arc::clone(&query), &config, tx.clone());
    let mut monitor = Monitor::new(WinEventSource::new(), query, tx);
    monitor.start()?;
    info!(
        "halo started (PID {}), border {} {}px",
        std::process::id(),
        config.border.color,
        config.border.width
    );

    consume(&mut coordinator, &rx);

    monitor.stop();
    info!("halo stopped");
    Ok(())
}

/// Handles events in order, pumping this thread's window messages
/// between them so the overlay window stays responsive.
fn consume<O: Overlay>(coordinator: &mut BorderCoordinator<O>, rx: &EventReceiver) {
    loop {
        pump_pending_messages();
        match rx.recv_timeout(PUMP_INTERVAL) {
            Ok(event) => {
                if coordinator.handle(event) == Flow::Exit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn pump_pending_messages() {
    let mut msg = MSG::default();
    while unsafe { PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() } {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Runs the monitor without an overlay and reports every published
/// transition until Ctrl+C.
pub fn watch_events(
    options: &DaemonOptions,
    mut on_change: impl FnMut(Option<&WindowSnapshot>, &Config),
) -> Result<()> {
    let config = prepare(options)?;
    halo_core::log::init(&config.logging)?;
    enable_dpi_awareness();

    let (tx, rx) = event::channel();
    ctrl_c::set_handler(tx.clone())?;
    let mut monitor = Monitor::new(WinEventSource::new(), Arc::new(Win32Query), tx);
    monitor.start()?;

    for event in rx.iter() {
        match event {
            BorderEvent::WindowChanged(snapshot) => on_change(snapshot.as_ref(), &config),
            BorderEvent::Shutdown => break,
            _ => {}
        }
    }

    monitor.stop();
    Ok(())
}
