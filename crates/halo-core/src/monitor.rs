//! Subscription lifecycle and the published `WindowChanged` stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::classify::{Classification, classify};
use crate::error::Result;
use crate::event::{self, BorderEvent, EventKind, EventSender, RawEvent};
use crate::query::WindowQuery;

/// How long `stop` waits for callbacks already in flight to drain.
const TEARDOWN_GRACE: Duration = Duration::from_millis(50);

/// Callback a source invokes for every raw notification. May be called
/// from any thread.
pub type RawEventSink = Arc<dyn Fn(RawEvent) + Send + Sync>;

/// A source of raw OS window notifications.
pub trait EventSource: Send {
    /// Starts delivering notifications to `sink`.
    fn subscribe(&mut self, sink: RawEventSink) -> Result<()>;

    /// Stops delivery. Callbacks already running may still complete.
    fn unsubscribe(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
}

/// Classifies raw notifications and posts the results.
struct Publisher {
    query: Arc<dyn WindowQuery>,
    tx: EventSender,
    running: Arc<AtomicBool>,
}

impl Publisher {
    fn handle(&self, event: RawEvent) {
        if !self.running.load(Ordering::SeqCst) {
            return;
        }
        let classification = classify(&event, self.query.as_ref());
        // Stop may have flipped the flag while we were querying.
        if !self.running.load(Ordering::SeqCst) {
            return;
        }

        match classification {
            Classification::Publish(snapshot) => {
                debug!("{:?} -> {snapshot}", event.kind);
                event::post(&self.tx, BorderEvent::WindowChanged(Some(snapshot)));
            }
            Classification::PublishNone => {
                debug!("{:?} -> no window", event.kind);
                event::post(&self.tx, BorderEvent::WindowChanged(None));
            }
            Classification::Discard(reason) => {
                debug!("discarded {:?} on 0x{:X}: {reason:?}", event.kind, event.handle);
            }
        }
    }
}

/// Owns the OS subscription and publishes `WindowChanged` transitions.
///
/// Every accepted notification is published, even when the snapshot is
/// unchanged. Bursts are absorbed downstream by the throttler.
pub struct Monitor<S: EventSource> {
    source: S,
    query: Arc<dyn WindowQuery>,
    tx: EventSender,
    running: Arc<AtomicBool>,
    publisher: Option<Arc<Publisher>>,
}

impl<S: EventSource> Monitor<S> {
    pub fn new(source: S, query: Arc<dyn WindowQuery>, tx: EventSender) -> Self {
        Self {
            source,
            query,
            tx,
            running: Arc::new(AtomicBool::new(false)),
            publisher: None,
        }
    }

    pub fn state(&self) -> MonitorState {
        if self.running.load(Ordering::SeqCst) {
            MonitorState::Running
        } else {
            MonitorState::Stopped
        }
    }

    /// Subscribes to notifications and publishes the current foreground
    /// window before returning.
    ///
    /// On subscription failure the monitor stays `Stopped`.
    pub fn start(&mut self) -> Result<()> {
        if self.state() == MonitorState::Running {
            return Ok(());
        }
        self.running.store(true, Ordering::SeqCst);

        let publisher = Arc::new(Publisher {
            query: Arc::clone(&self.query),
            tx: self.tx.clone(),
            running: Arc::clone(&self.running),
        });
        let sink: RawEventSink = {
            let publisher = Arc::clone(&publisher);
            Arc::new(move |event| publisher.handle(event))
        };

        if let Err(e) = self.source.subscribe(sink) {
            self.running.store(false, Ordering::SeqCst);
            error!("monitor failed to start: {e}");
            return Err(e);
        }
        info!("window monitor started");

        if let Some(foreground) = self.query.foreground() {
            publisher.handle(RawEvent::window(EventKind::Foreground, foreground));
        }
        self.publisher = Some(publisher);
        Ok(())
    }

    /// Unsubscribes, then waits briefly for in-flight callbacks to see the
    /// stopped flag before dropping the publisher.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.source.unsubscribe();
        thread::sleep(TEARDOWN_GRACE);
        self.publisher = None;
        info!("window monitor stopped");
    }
}

impl<S: EventSource> Drop for Monitor<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDesktop, FakeWindow, ScriptedSource};
    use crate::{Error, Rect};

    fn desktop() -> Arc<FakeDesktop> {
        let desktop = Arc::new(FakeDesktop::new());
        desktop.add(0xA, FakeWindow::app("App", "a", Rect::new(0, 0, 400, 300)));
        desktop.add(0xB, FakeWindow::app("App", "b", Rect::new(50, 50, 400, 300)));
        desktop.set_foreground(Some(0xA));
        desktop
    }

    fn published(rx: &event::EventReceiver) -> Vec<Option<usize>> {
        rx.try_iter()
            .filter_map(|e| match e {
                BorderEvent::WindowChanged(s) => Some(s.map(|s| s.handle())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_publishes_current_foreground() {
        // Arrange
        let (tx, rx) = event::channel();
        let source = ScriptedSource::default();
        let mut monitor = Monitor::new(source.clone(), desktop(), tx);

        // Act
        monitor.start().unwrap();

        // Assert
        assert_eq!(monitor.state(), MonitorState::Running);
        assert!(source.is_subscribed());
        assert_eq!(published(&rx), vec![Some(0xA)]);
    }

    #[test]
    fn subscription_failure_leaves_monitor_stopped() {
        // Arrange
        let (tx, rx) = event::channel();
        let mut monitor = Monitor::new(ScriptedSource::failing(), desktop(), tx);

        // Act
        let result = monitor.start();

        // Assert
        assert!(matches!(result, Err(Error::Subscribe(_))));
        assert_eq!(monitor.state(), MonitorState::Stopped);
        assert!(published(&rx).is_empty());
    }

    #[test]
    fn background_notifications_publish_nothing() {
        // Arrange
        let (tx, rx) = event::channel();
        let source = ScriptedSource::default();
        let mut monitor = Monitor::new(source.clone(), desktop(), tx);
        monitor.start().unwrap();
        rx.try_iter().for_each(drop);

        // Act
        for kind in [
            EventKind::LocationChange,
            EventKind::StateChange,
            EventKind::MinimizeStart,
            EventKind::MinimizeEnd,
            EventKind::Destroy,
            EventKind::Hide,
        ] {
            source.emit(RawEvent::window(kind, 0xB));
        }

        // Assert
        assert!(published(&rx).is_empty());
    }

    #[test]
    fn unchanged_snapshots_are_republished() {
        // Arrange
        let (tx, rx) = event::channel();
        let source = ScriptedSource::default();
        let desktop = desktop();
        let mut monitor = Monitor::new(source.clone(), desktop.clone(), tx);
        monitor.start().unwrap();

        // Act
        source.emit(RawEvent::window(EventKind::LocationChange, 0xA));
        source.emit(RawEvent::window(EventKind::StateChange, 0xA));
        desktop.update(0xA, |w| w.frame = Some(Rect::new(10, 10, 400, 300)));
        source.emit(RawEvent::window(EventKind::LocationChange, 0xA));

        // Assert
        assert_eq!(
            published(&rx),
            vec![Some(0xA), Some(0xA), Some(0xA), Some(0xA)]
        );
    }

    #[test]
    fn closing_foreground_window_publishes_none() {
        // Arrange
        let (tx, rx) = event::channel();
        let source = ScriptedSource::default();
        let desktop = desktop();
        let mut monitor = Monitor::new(source.clone(), desktop.clone(), tx);
        monitor.start().unwrap();

        // Act
        desktop.remove(0xA);
        source.emit(RawEvent::window(EventKind::Destroy, 0xA));

        // Assert
        assert_eq!(published(&rx), vec![Some(0xA), None]);
    }

    #[test]
    fn stop_discards_in_flight_callbacks() {
        // Arrange
        let (tx, rx) = event::channel();
        let source = ScriptedSource::default();
        let desktop = desktop();
        let mut monitor = Monitor::new(source.clone(), desktop.clone(), tx);
        monitor.start().unwrap();
        rx.try_iter().for_each(drop);
        let in_flight = source.sink().unwrap();

        // Act
        monitor.stop();
        desktop.set_foreground(Some(0xB));
        in_flight(RawEvent::window(EventKind::Foreground, 0xB));

        // Assert
        assert_eq!(monitor.state(), MonitorState::Stopped);
        assert!(!source.is_subscribed());
        assert!(published(&rx).is_empty());
    }

    #[test]
    fn monitor_can_restart_after_stop() {
        // Arrange
        let (tx, rx) = event::channel();
        let source = ScriptedSource::default();
        let mut monitor = Monitor::new(source.clone(), desktop(), tx);
        monitor.start().unwrap();
        monitor.stop();
        rx.try_iter().for_each(drop);

        // Act
        monitor.start().unwrap();

        // Assert
        assert_eq!(published(&rx), vec![Some(0xA)]);
        assert!(source.is_subscribed());
    }
}
