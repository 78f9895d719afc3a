use std::cell::RefCell;
use std::sync::mpsc;
use std::thread;

use halo_core::{Error, EventSource, RawEventSink, Result};
use tracing::{debug, error};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PostThreadMessageW, TranslateMessage,
    WINEVENT_OUTOFCONTEXT, WINEVENT_SKIPOWNPROCESS, WM_QUIT,
};

use crate::event::{HOOK_RANGES, translate};

// Sink for the WinEvent callback, set on the hook thread only.
thread_local! {
    static SINK: RefCell<Option<RawEventSink>> = const { RefCell::new(None) };
}

struct HookThread {
    thread_id: u32,
    handle: thread::JoinHandle<()>,
}

/// WinEvent hooks running on a dedicated message-pump thread.
///
/// Out-of-context callbacks are delivered through that thread's message
/// queue, so they run one at a time on it.
#[derive(Default)]
pub struct WinEventSource {
    thread: Option<HookThread>,
}

impl WinEventSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSource for WinEventSource {
    fn subscribe(&mut self, sink: RawEventSink) -> Result<()> {
        self.unsubscribe();

        let (ready_tx, ready_rx) = mpsc::channel::<std::result::Result<u32, String>>();
        let handle = thread::spawn(move || {
            SINK.with(|cell| *cell.borrow_mut() = Some(sink));
            let thread_id = unsafe { GetCurrentThreadId() };

            let mut hooks = Vec::with_capacity(HOOK_RANGES.len());
            for (min, max) in HOOK_RANGES {
                // SAFETY: out-of-context hooks call back on this thread
                // while it pumps messages; our own windows are skipped.
                let hook = unsafe {
                    SetWinEventHook(
                        min,
                        max,
                        None,
                        Some(win_event_proc),
                        0,
                        0,
                        WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
                    )
                };
                if hook.is_invalid() {
                    unhook_all(&hooks);
                    let _ = ready_tx.send(Err(format!(
                        "SetWinEventHook failed for 0x{min:04X}..0x{max:04X}"
                    )));
                    return;
                }
                hooks.push(hook);
            }
            debug!("installed {} WinEvent hooks", hooks.len());
            let _ = ready_tx.send(Ok(thread_id));

            run_message_pump();

            unhook_all(&hooks);
            SINK.with(|cell| cell.borrow_mut().take());
        });

        let thread_id = ready_rx
            .recv()
            .map_err(|_| Error::Subscribe("hook thread exited unexpectedly".into()))?
            .map_err(|e| {
                error!("{e}");
                Error::Subscribe(e)
            })?;

        self.thread = Some(HookThread { thread_id, handle });
        Ok(())
    }

    fn unsubscribe(&mut self) {
        let Some(hook) = self.thread.take() else {
            return;
        };
        unsafe {
            let _ = PostThreadMessageW(hook.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        let _ = hook.handle.join();
    }
}

impl Drop for WinEventSource {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn unhook_all(hooks: &[HWINEVENTHOOK]) {
    for hook in hooks {
        unsafe {
            let _ = UnhookWinEvent(*hook);
        }
    }
}

/// Blocks until `WM_QUIT`.
fn run_message_pump() {
    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    let Some(raw) = translate(event, hwnd.0 as usize, id_object) else {
        return;
    };
    let sink = SINK.with(|cell| cell.borrow().clone());
    if let Some(sink) = sink {
        sink(raw);
    }
}
