//! The single consumer of every `BorderEvent`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{Config, ExclusionRule, is_excluded};
use crate::context::BorderedWindow;
use crate::event::{BorderEvent, EventSender};
use crate::overlay::Overlay;
use crate::query::WindowQuery;
use crate::readiness::{Readiness, ReadinessWaiter, Sequence};
use crate::throttle::{Throttle, Throttler};
use crate::validator::Validator;
use crate::window::WindowSnapshot;

/// Whether the consumer loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Drives the overlay from the ordered event stream.
///
/// Every producer posts into one channel and this type handles the
/// events one at a time, so overlay calls never overlap. Background
/// results (readiness waits, deferred shows) carry the transition
/// number they were started for and are dropped once a newer transition
/// has begun.
pub struct BorderCoordinator<O: Overlay> {
    overlay: O,
    query: Arc<dyn WindowQuery>,
    exclusions: Vec<ExclusionRule>,
    bordered: BorderedWindow,
    sequence: Sequence,
    validator: Validator,
    throttler: Throttler,
    readiness: ReadinessWaiter,
}

impl<O: Overlay> BorderCoordinator<O> {
    pub fn new(overlay: O, query: Arc<dyn WindowQuery>, config: &Config, tx: EventSender) -> Self {
        let sequence = Sequence::new();
        Self {
            validator: Validator::new(
                config.window.validation_interval(),
                Arc::clone(&query),
                tx.clone(),
            ),
            throttler: Throttler::new(&config.throttle, tx.clone()),
            readiness: ReadinessWaiter::new(
                Arc::clone(&query),
                sequence.clone(),
                config.window.readiness_interval(),
                config.window.readiness_timeout(),
                tx,
            ),
            overlay,
            query,
            exclusions: config.window.exclusions.clone(),
            bordered: BorderedWindow::new(),
            sequence,
        }
    }

    pub fn handle(&mut self, event: BorderEvent) -> Flow {
        match event {
            BorderEvent::WindowChanged(Some(snapshot)) => self.on_window(snapshot),
            BorderEvent::WindowChanged(None) => {
                self.sequence.advance();
                self.clear_border();
            }
            BorderEvent::ReadinessSettled {
                seq,
                snapshot,
                readiness,
            } => self.on_readiness(seq, snapshot, readiness),
            BorderEvent::DeferredShow { seq, snapshot } => self.on_deferred(seq, &snapshot),
            BorderEvent::WindowInvalidated(snapshot) => self.on_invalidated(&snapshot),
            BorderEvent::Shutdown => {
                info!("shutting down");
                self.clear_border();
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    fn on_window(&mut self, snapshot: WindowSnapshot) {
        let seq = self.sequence.advance();
        if is_excluded(&snapshot, &self.exclusions) {
            debug!("excluded {snapshot}");
            return;
        }
        if !snapshot.can_have_border() {
            debug!("not eligible {snapshot}");
            self.clear_border();
            return;
        }
        if self.query.is_valid_for_border(snapshot.handle()) {
            self.proceed(seq, snapshot);
        } else {
            debug!("waiting for 0x{:X} to appear", snapshot.handle());
            self.readiness.submit(seq, snapshot);
        }
    }

    fn on_readiness(&mut self, seq: u64, snapshot: WindowSnapshot, readiness: Readiness) {
        if !self.sequence.is_current(seq) {
            debug!("stale readiness for 0x{:X}", snapshot.handle());
            return;
        }
        match readiness {
            Readiness::Ready => self.proceed(seq, snapshot),
            other => debug!("0x{:X} never became ready: {other:?}", snapshot.handle()),
        }
    }

    fn proceed(&mut self, seq: u64, snapshot: WindowSnapshot) {
        if !self.query.is_valid_for_border(snapshot.handle()) {
            debug!("0x{:X} is no longer valid for a border", snapshot.handle());
            return;
        }
        self.validator.stop();
        match self.throttler.observe(&snapshot, seq, Instant::now()) {
            Throttle::Immediate => self.show(snapshot),
            Throttle::Rapid => self.hide(),
        }
    }

    fn on_deferred(&mut self, seq: u64, snapshot: &WindowSnapshot) {
        if !self.sequence.is_current(seq) {
            debug!("stale deferred show for 0x{:X}", snapshot.handle());
            return;
        }
        let handle = snapshot.handle();
        let Some(fresh) = self.query.resolve(handle) else {
            debug!("0x{handle:X} closed during the quiet period");
            return;
        };
        if !fresh.can_have_border()
            || !self.query.is_valid_for_border(handle)
            || is_excluded(&fresh, &self.exclusions)
        {
            debug!("0x{handle:X} no longer eligible after the quiet period");
            return;
        }
        self.show(fresh);
    }

    fn on_invalidated(&mut self, snapshot: &WindowSnapshot) {
        let overlay = &mut self.overlay;
        if self.bordered.clear_if_with(snapshot.handle(), || overlay.hide()) {
            info!("border removed from 0x{:X}", snapshot.handle());
        }
    }

    fn show(&mut self, snapshot: WindowSnapshot) {
        info!("border on {snapshot}");
        let overlay = &mut self.overlay;
        self.bordered
            .set_with(snapshot.handle(), || overlay.show(&snapshot));
        self.validator.start(snapshot);
    }

    fn hide(&mut self) {
        let overlay = &mut self.overlay;
        self.bordered.clear_with(|| overlay.hide());
    }

    fn clear_border(&mut self) {
        self.throttler.cancel_pending();
        self.validator.stop();
        self.hide();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::Rect;
    use crate::event::{self, EventKind, RawEvent};
    use crate::monitor::Monitor;
    use crate::testing::{FakeDesktop, FakeWindow, OverlayCall, RecordingOverlay, ScriptedSource};

    struct Harness {
        desktop: Arc<FakeDesktop>,
        overlay: RecordingOverlay,
        tx: EventSender,
        rx: event::EventReceiver,
        coordinator: BorderCoordinator<RecordingOverlay>,
    }

    fn harness(rapid_threshold_ms: u64) -> Harness {
        harness_with(rapid_threshold_ms, |_| {})
    }

    fn harness_with(rapid_threshold_ms: u64, tweak: impl FnOnce(&mut Config)) -> Harness {
        let desktop = Arc::new(FakeDesktop::new());
        desktop.add(0xA, FakeWindow::app("App", "a", Rect::new(0, 0, 400, 300)));
        desktop.add(0xB, FakeWindow::app("App", "b", Rect::new(50, 50, 400, 300)));
        desktop.add(
            0xC,
            FakeWindow::app("Shell_TrayWnd", "", Rect::new(0, 1040, 1920, 40)),
        );
        desktop.set_foreground(Some(0xA));

        let mut config = Config::default();
        config.window.validation_interval_ms = 20;
        config.window.readiness_interval_ms = 5;
        config.window.readiness_timeout_ms = 500;
        config.throttle.rapid_threshold_ms = rapid_threshold_ms;
        config.throttle.quiet_delay_ms = 50;
        tweak(&mut config);

        let (tx, rx) = event::channel();
        let overlay = RecordingOverlay::default();
        let coordinator =
            BorderCoordinator::new(overlay.clone(), desktop.clone(), &config, tx.clone());
        Harness {
            desktop,
            overlay,
            tx,
            rx,
            coordinator,
        }
    }

    impl Harness {
        fn bordered(&self) -> Option<usize> {
            self.coordinator.bordered.current()
        }

        fn changed(&mut self, handle: usize) -> Flow {
            let snapshot = self.desktop.resolve(handle).unwrap();
            self.coordinator
                .handle(BorderEvent::WindowChanged(Some(snapshot)))
        }

        /// Waits for the next posted event matching `pred` and handles it.
        fn pump_until(&mut self, pred: impl Fn(&BorderEvent) -> bool) {
            loop {
                let event = self.rx.recv_timeout(Duration::from_secs(2)).unwrap();
                if pred(&event) {
                    self.coordinator.handle(event);
                    return;
                }
            }
        }
    }

    #[test]
    fn shows_eligible_window() {
        // Arrange
        let mut h = harness(0);

        // Act
        h.changed(0xA);

        // Assert
        assert_eq!(h.overlay.calls(), vec![OverlayCall::Show(0xA)]);
        assert_eq!(h.bordered(), Some(0xA));
    }

    #[test]
    fn no_window_hides_and_clears() {
        // Arrange
        let mut h = harness(0);
        h.changed(0xA);

        // Act
        h.coordinator.handle(BorderEvent::WindowChanged(None));
        h.coordinator.handle(BorderEvent::WindowChanged(None));

        // Assert
        assert_eq!(
            h.overlay.calls(),
            vec![OverlayCall::Show(0xA), OverlayCall::Hide, OverlayCall::Hide]
        );
        assert_eq!(h.bordered(), None);
    }

    #[test]
    fn excluded_window_is_ignored() {
        // Arrange
        let mut h = harness(0);
        h.desktop.set_foreground(Some(0xC));

        // Act
        h.changed(0xC);

        // Assert
        assert!(h.overlay.calls().is_empty());
        assert_eq!(h.bordered(), None);
    }

    #[test]
    fn maximized_window_hides_border() {
        // Arrange
        let mut h = harness(0);
        h.changed(0xA);
        h.desktop.update(0xA, |w| w.show_command = Some(3));

        // Act
        h.changed(0xA);

        // Assert
        assert_eq!(
            h.overlay.calls(),
            vec![OverlayCall::Show(0xA), OverlayCall::Hide]
        );
    }

    #[test]
    fn cloaked_window_is_shown_once_ready() {
        // Arrange
        let mut h = harness(0);
        h.desktop.update(0xA, |w| w.cloaked = Some(true));
        h.changed(0xA);
        assert!(h.overlay.calls().is_empty());

        // Act
        h.desktop.update(0xA, |w| w.cloaked = Some(false));
        h.pump_until(|e| matches!(e, BorderEvent::ReadinessSettled { .. }));

        // Assert
        assert_eq!(h.overlay.calls(), vec![OverlayCall::Show(0xA)]);
    }

    #[test]
    fn stale_readiness_is_dropped() {
        // Arrange
        let mut h = harness(0);
        let a = h.desktop.resolve(0xA).unwrap();
        h.desktop.set_foreground(Some(0xB));
        h.changed(0xB);

        // Act
        h.coordinator.handle(BorderEvent::ReadinessSettled {
            seq: 0,
            snapshot: a,
            readiness: Readiness::Ready,
        });

        // Assert
        assert_eq!(h.overlay.calls(), vec![OverlayCall::Show(0xB)]);
        assert_eq!(h.bordered(), Some(0xB));
    }

    #[test]
    fn invalidation_of_other_window_keeps_border() {
        // Arrange
        let mut h = harness(0);
        h.changed(0xA);
        let b = h.desktop.resolve(0xB).unwrap();
        let a = h.desktop.resolve(0xA).unwrap();

        // Act
        h.coordinator.handle(BorderEvent::WindowInvalidated(b));
        let after_other = h.overlay.calls();
        h.coordinator.handle(BorderEvent::WindowInvalidated(a));

        // Assert
        assert_eq!(after_other, vec![OverlayCall::Show(0xA)]);
        assert_eq!(
            h.overlay.calls(),
            vec![OverlayCall::Show(0xA), OverlayCall::Hide]
        );
        assert_eq!(h.bordered(), None);
    }

    #[test]
    fn validator_invalidation_hides_border() {
        // Arrange
        let mut h = harness(0);
        h.changed(0xA);

        // Act
        h.desktop.set_foreground(Some(0xB));
        h.pump_until(|e| matches!(e, BorderEvent::WindowInvalidated(_)));

        // Assert
        assert_eq!(
            h.overlay.calls(),
            vec![OverlayCall::Show(0xA), OverlayCall::Hide]
        );
    }

    #[test]
    fn burst_hides_then_shows_last_window() {
        // Arrange
        let mut h = harness(200);
        h.changed(0xA);

        // Act
        h.desktop.set_foreground(Some(0xB));
        h.changed(0xB);
        let during_burst = h.overlay.calls();
        h.pump_until(|e| matches!(e, BorderEvent::DeferredShow { .. }));

        // Assert
        assert_eq!(
            during_burst,
            vec![OverlayCall::Show(0xA), OverlayCall::Hide]
        );
        assert_eq!(
            h.overlay.calls(),
            vec![
                OverlayCall::Show(0xA),
                OverlayCall::Hide,
                OverlayCall::Show(0xB)
            ]
        );
    }

    #[test]
    fn deferred_show_revalidates_window() {
        // Arrange
        let mut h = harness(200);
        h.changed(0xA);
        h.changed(0xA);

        // Act
        h.desktop.update(0xA, |w| w.show_command = Some(2));
        h.pump_until(|e| matches!(e, BorderEvent::DeferredShow { .. }));

        // Assert
        assert_eq!(
            h.overlay.calls(),
            vec![OverlayCall::Show(0xA), OverlayCall::Hide]
        );
    }

    #[test]
    fn window_skipped_while_cloaked_is_bordered_on_its_next_event() {
        // Arrange
        let mut h = harness_with(0, |c| c.window.readiness_timeout_ms = 50);
        h.desktop.update(0xA, |w| w.cloaked = Some(true));
        let source = ScriptedSource::default();
        let mut monitor = Monitor::new(source.clone(), h.desktop.clone(), h.tx.clone());
        monitor.start().unwrap();
        h.pump_until(|e| matches!(e, BorderEvent::WindowChanged(_)));
        h.pump_until(|e| {
            matches!(
                e,
                BorderEvent::ReadinessSettled {
                    readiness: Readiness::NotReady,
                    ..
                }
            )
        });
        assert!(h.overlay.calls().is_empty());

        // Act
        h.desktop.update(0xA, |w| w.cloaked = Some(false));
        source.emit(RawEvent::window(EventKind::StateChange, 0xA));
        h.pump_until(|e| matches!(e, BorderEvent::WindowChanged(_)));

        // Assert
        assert_eq!(h.overlay.calls(), vec![OverlayCall::Show(0xA)]);
        assert_eq!(h.bordered(), Some(0xA));
        monitor.stop();
    }

    #[test]
    fn ready_window_that_takes_foreground_late_is_bordered() {
        // Arrange
        let mut h = harness(0);
        h.desktop.set_foreground(None);

        // Act
        h.changed(0xB);
        h.desktop.set_foreground(Some(0xB));
        h.pump_until(|e| matches!(e, BorderEvent::ReadinessSettled { .. }));

        // Assert
        assert_eq!(h.overlay.calls(), vec![OverlayCall::Show(0xB)]);
    }

    #[test]
    fn shutdown_hides_and_exits() {
        // Arrange
        let mut h = harness(0);
        h.changed(0xA);

        // Act
        let flow = h.coordinator.handle(BorderEvent::Shutdown);

        // Assert
        assert_eq!(flow, Flow::Exit);
        assert_eq!(h.overlay.calls().last(), Some(&OverlayCall::Hide));
    }
}
