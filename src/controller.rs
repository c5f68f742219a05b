// =============================================================================
// controller.rs - Single-flight picker controller
// controller.rs - Contrôleur du picker, une présentation à la fois
// =============================================================================
//
// PickerController owns the session slot. A session is installed by `show`,
// and removed by exactly one terminal event: a report from the presenter,
// a `hide`, or a synchronous presentation failure. Whatever removes the
// session owns its completion, so the host hears back at most once. Reporters
// resolve their session when dropped, so it also hears back at least once.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{PickerError, PickerResult};
use crate::options::PickerConfiguration;
use crate::picker::common::{ColorResult, PickerOutcome};
use crate::picker::Presenter;

/// Completion of a session, invoked with its single outcome
type Completion = Box<dyn FnOnce(PickerOutcome) + Send + 'static>;

/// Identifier of one presentation, unique per controller
pub type SessionId = u64;

// =============================================================================
// ÉTAT
// STATE
// =============================================================================

/// État du contrôleur
/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    Presenting,
}

/// Terminal event as seen by the UI layer, before it is mapped to an outcome
#[derive(Debug)]
enum Terminal {
    Selected(ColorResult),
    Dismissed,
    Failed(String),
}

/// Record of the dialog currently open
struct PresentationSession {
    id: SessionId,
    completion: Completion,
    /// Set while `Presenter::present` runs; reports are parked in `deferred`
    launching: bool,
    deferred: Option<Terminal>,
}

#[derive(Default)]
struct SessionSlot {
    active: Option<PresentationSession>,
    last_id: SessionId,
}

type SharedSlot = Arc<Mutex<SessionSlot>>;

/// Removes the session `id` from the slot and runs its completion, or parks
/// the report while `present` is still running. Stale ids are ignored.
fn resolve(slot: &SharedSlot, id: SessionId, terminal: Terminal) {
    let mut guard = slot.lock();
    let launching = guard
        .active
        .as_ref()
        .filter(|session| session.id == id)
        .map(|session| session.launching);

    match launching {
        None => {
            drop(guard);
            debug!(session = id, "ignoring report for a session that already resolved");
        }
        Some(true) => {
            // The controller delivers it once `present` returns
            if let Some(session) = guard.active.as_mut() {
                if session.deferred.is_none() {
                    session.deferred = Some(terminal);
                }
            }
        }
        Some(false) => {
            let session = guard.active.take();
            drop(guard);
            if let Some(session) = session {
                complete(session, terminal);
            }
        }
    }
}

/// Runs the completion of a session removed from the slot. Never call with the lock held.
fn complete(session: PresentationSession, terminal: Terminal) {
    let id = session.id;
    let outcome = match terminal {
        Terminal::Selected(color) => {
            info!(session = id, color = %color, "color selected");
            PickerOutcome::Selected(color)
        }
        Terminal::Dismissed => {
            info!(session = id, "color picker dismissed");
            PickerOutcome::Dismissed
        }
        Terminal::Failed(reason) => {
            warn!(session = id, %reason, "color picker failed, reporting a dismissal");
            PickerOutcome::Dismissed
        }
    };
    (session.completion)(outcome);
}

// =============================================================================
// REPORTER
// =============================================================================

/// One-shot handle a [`Presenter`] uses to report how its session ended.
///
/// Every reporting method consumes the reporter, so a session cannot be
/// reported twice. A reporter dropped without reporting counts as a
/// failure, which the host sees as a dismissal.
pub struct OutcomeReporter {
    slot: SharedSlot,
    session: SessionId,
    reported: bool,
}

impl OutcomeReporter {
    fn new(slot: SharedSlot, session: SessionId) -> Self {
        Self {
            slot,
            session,
            reported: false,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session
    }

    /// The user confirmed `color`
    pub fn selected(mut self, color: impl Into<ColorResult>) {
        self.report(Terminal::Selected(color.into()));
    }

    /// The dialog closed without a confirmed color
    pub fn dismissed(mut self) {
        self.report(Terminal::Dismissed);
    }

    /// The UI layer broke down after presenting (lost its window, etc.)
    pub fn failed(mut self, reason: impl fmt::Display) {
        self.report(Terminal::Failed(reason.to_string()));
    }

    fn report(&mut self, terminal: Terminal) {
        self.reported = true;
        resolve(&self.slot, self.session, terminal);
    }
}

impl Drop for OutcomeReporter {
    fn drop(&mut self) {
        if !self.reported {
            self.report(Terminal::Failed("reporter dropped without an outcome".to_string()));
        }
    }
}

impl fmt::Debug for OutcomeReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeReporter")
            .field("session", &self.session)
            .field("reported", &self.reported)
            .finish()
    }
}

// =============================================================================
// FUTURE
// =============================================================================

/// Outcome of a presentation started with [`PickerController::show_async`]
#[derive(Debug)]
#[must_use = "the outcome is lost if the pending pick is dropped"]
pub struct PendingPick {
    session: SessionId,
    rx: oneshot::Receiver<PickerOutcome>,
}

impl PendingPick {
    pub fn session_id(&self) -> SessionId {
        self.session
    }
}

impl Future for PendingPick {
    type Output = PickerOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // Whole controller torn down mid-session
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(PickerOutcome::Dismissed),
            Poll::Pending => Poll::Pending,
        }
    }
}

// =============================================================================
// CONTRÔLEUR
// CONTROLLER
// =============================================================================

/// Contrôleur du dialogue de sélection de couleur
/// Color selection dialog controller
///
/// At most one dialog is open per controller. `show` while a dialog is open
/// fails with [`PickerError::AlreadyPresenting`] and leaves the open dialog
/// alone.
pub struct PickerController<P> {
    presenter: P,
    slot: SharedSlot,
}

impl<P: Presenter> PickerController<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            presenter,
            slot: Arc::new(Mutex::new(SessionSlot::default())),
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn state(&self) -> PickerState {
        if self.slot.lock().active.is_some() {
            PickerState::Presenting
        } else {
            PickerState::Idle
        }
    }

    pub fn is_presenting(&self) -> bool {
        self.state() == PickerState::Presenting
    }

    /// Affiche le picker avec une paire de callbacks
    /// Shows the picker with a pair of callbacks
    ///
    /// Exactly one of `on_selected` / `on_dismissed` runs, once, for every
    /// call that returns `Ok`. Neither runs when the call returns `Err`.
    pub fn show<S, D>(&mut self, config: &PickerConfiguration, on_selected: S, on_dismissed: D) -> PickerResult<()>
    where
        S: FnOnce(ColorResult) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        self.show_with(config, move |outcome| match outcome {
            PickerOutcome::Selected(color) => on_selected(color),
            PickerOutcome::Dismissed => on_dismissed(),
        })
    }

    /// Shows the picker, handing the single outcome to `completion`
    pub fn show_with<F>(&mut self, config: &PickerConfiguration, completion: F) -> PickerResult<()>
    where
        F: FnOnce(PickerOutcome) + Send + 'static,
    {
        self.present(config, Box::new(completion)).map(|_| ())
    }

    /// Shows the picker and returns a future resolving to its outcome
    pub fn show_async(&mut self, config: &PickerConfiguration) -> PickerResult<PendingPick> {
        let (tx, rx) = oneshot::channel();
        let session = self.present(
            config,
            Box::new(move |outcome| {
                // Receiver gone means the host stopped caring
                let _ = tx.send(outcome);
            }),
        )?;
        Ok(PendingPick { session, rx })
    }

    /// Ferme le picker par programme
    /// Closes the picker programmatically
    ///
    /// The open session resolves as dismissed right away; whatever its
    /// presenter reports afterwards is ignored. No-op when idle.
    pub fn hide(&mut self) {
        let active = self.slot.lock().active.take();
        let Some(session) = active else {
            debug!("hide requested with no picker open");
            return;
        };

        debug!(session = session.id, "hiding color picker");
        self.presenter.hide();
        complete(session, Terminal::Dismissed);
    }

    fn present(&mut self, config: &PickerConfiguration, completion: Completion) -> PickerResult<SessionId> {
        let id = {
            let mut slot = self.slot.lock();
            if let Some(active) = slot.active.as_ref() {
                warn!(active = active.id, "show rejected, a color picker is already open");
                return Err(PickerError::AlreadyPresenting);
            }

            slot.last_id += 1;
            let id = slot.last_id;
            slot.active = Some(PresentationSession {
                id,
                completion,
                launching: true,
                deferred: None,
            });
            id
        };

        debug!(
            session = id,
            color = config.color(),
            supports_alpha = config.supports_alpha(),
            title = config.title(),
            "presenting color picker"
        );

        let reporter = OutcomeReporter::new(Arc::clone(&self.slot), id);
        match self.presenter.present(config, reporter) {
            Ok(()) => {
                self.finish_launch(id);
                Ok(id)
            }
            Err(err) => {
                // Callbacks are dropped unrun, the error is the outcome
                let discarded = {
                    let mut slot = self.slot.lock();
                    if slot.active.as_ref().is_some_and(|session| session.id == id) {
                        slot.active.take()
                    } else {
                        None
                    }
                };
                drop(discarded);
                warn!(session = id, error = %err, "color picker presentation failed");
                Err(PickerError::PresentationFailed(err))
            }
        }
    }

    /// Ends the launch phase, delivering a report made while `present` ran
    fn finish_launch(&mut self, id: SessionId) {
        let ready = {
            let mut slot = self.slot.lock();
            let deferred = match slot.active.as_mut() {
                Some(session) if session.id == id => {
                    session.launching = false;
                    session.deferred.take()
                }
                _ => None,
            };
            match deferred {
                Some(terminal) => slot.active.take().map(|session| (session, terminal)),
                None => None,
            }
        };

        if let Some((session, terminal)) = ready {
            complete(session, terminal);
        }
    }
}

impl<P> fmt::Debug for PickerController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("PickerController")
            .field("active_session", &slot.active.as_ref().map(|session| session.id))
            .field("last_session", &slot.last_id)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PresentError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What the scripted presenter does when asked to present
    #[derive(Clone)]
    enum Script {
        /// Keep the reporter for the test to fire later
        Hold,
        /// Report a selection before `present` returns
        SelectNow(&'static str),
        /// Drop the reporter without reporting
        DropReporter,
        /// Fail synchronously
        Fail(PresentError),
    }

    /// Presenter double whose state is shared with the test through `Probe`
    struct ScriptedPresenter {
        script: Script,
        probe: Probe,
    }

    #[derive(Clone, Default)]
    struct Probe {
        pending: Arc<Mutex<Option<OutcomeReporter>>>,
        presented: Arc<Mutex<Vec<PickerConfiguration>>>,
        hides: Arc<AtomicUsize>,
    }

    impl Probe {
        fn reporter(&self) -> OutcomeReporter {
            self.pending.lock().take().expect("no pending reporter")
        }

        fn select(&self, color: &str) {
            self.reporter().selected(color);
        }

        fn dismiss(&self) {
            self.reporter().dismissed();
        }

        fn presentations(&self) -> usize {
            self.presented.lock().len()
        }
    }

    impl Presenter for ScriptedPresenter {
        fn present(&mut self, config: &PickerConfiguration, reporter: OutcomeReporter) -> Result<(), PresentError> {
            self.probe.presented.lock().push(config.clone());
            match &self.script {
                Script::Hold => {
                    *self.probe.pending.lock() = Some(reporter);
                    Ok(())
                }
                Script::SelectNow(color) => {
                    reporter.selected(*color);
                    Ok(())
                }
                Script::DropReporter => Ok(()),
                Script::Fail(err) => Err(err.clone()),
            }
        }

        fn hide(&mut self) {
            self.probe.hides.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller(script: Script) -> (PickerController<ScriptedPresenter>, Probe) {
        let probe = Probe::default();
        let presenter = ScriptedPresenter {
            script,
            probe: probe.clone(),
        };
        (PickerController::new(presenter), probe)
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Selected(&'static str, String),
        Dismissed(&'static str),
    }

    type Log = Arc<Mutex<Vec<Event>>>;

    fn on_selected(log: &Log, tag: &'static str) -> impl FnOnce(ColorResult) + Send + 'static {
        let log = Arc::clone(log);
        move |color| log.lock().push(Event::Selected(tag, color.into_string()))
    }

    fn on_dismissed(log: &Log, tag: &'static str) -> impl FnOnce() + Send + 'static {
        let log = Arc::clone(log);
        move || log.lock().push(Event::Dismissed(tag))
    }

    fn events(log: &Log) -> Vec<Event> {
        log.lock().clone()
    }

    #[test]
    fn selection_fires_on_selected_once() {
        let (mut picker, probe) = controller(Script::Hold);
        let log = Log::default();
        let config = PickerConfiguration::new().with_color("#FF0000");

        picker
            .show(&config, on_selected(&log, "A"), on_dismissed(&log, "B"))
            .unwrap();
        assert_eq!(picker.state(), PickerState::Presenting);
        assert!(events(&log).is_empty());

        probe.select("#00FF00");
        assert_eq!(events(&log), vec![Event::Selected("A", "#00FF00".to_string())]);
        assert_eq!(picker.state(), PickerState::Idle);
    }

    #[test]
    fn dismissal_fires_on_dismissed_once() {
        let (mut picker, probe) = controller(Script::Hold);
        let log = Log::default();

        picker
            .show(&PickerConfiguration::default(), on_selected(&log, "A"), on_dismissed(&log, "B"))
            .unwrap();
        probe.dismiss();

        assert_eq!(events(&log), vec![Event::Dismissed("B")]);
        assert!(!picker.is_presenting());
    }

    #[test]
    fn reentrant_show_is_rejected() {
        let (mut picker, probe) = controller(Script::Hold);
        let log = Log::default();
        let config = PickerConfiguration::default();

        picker.show(&config, on_selected(&log, "A"), on_dismissed(&log, "B")).unwrap();
        let second = picker.show(&config, on_selected(&log, "C"), on_dismissed(&log, "D"));

        assert!(matches!(second, Err(PickerError::AlreadyPresenting)));
        assert!(events(&log).is_empty());
        assert_eq!(probe.presentations(), 1);
        assert_eq!(picker.state(), PickerState::Presenting);

        // First session is still the one that resolves
        probe.select("#0000FF");
        assert_eq!(events(&log), vec![Event::Selected("A", "#0000FF".to_string())]);
    }

    #[test]
    fn sessions_after_a_terminal_event_are_independent() {
        let (mut picker, probe) = controller(Script::Hold);
        let log = Log::default();
        let config = PickerConfiguration::default();

        picker.show(&config, on_selected(&log, "A"), on_dismissed(&log, "B")).unwrap();
        probe.dismiss();
        assert_eq!(picker.state(), PickerState::Idle);

        picker.show(&config, on_selected(&log, "C"), on_dismissed(&log, "D")).unwrap();
        probe.select("#ABCDEF");

        assert_eq!(
            events(&log),
            vec![
                Event::Dismissed("B"),
                Event::Selected("C", "#ABCDEF".to_string()),
            ]
        );
        assert_eq!(probe.presentations(), 2);
    }

    #[test]
    fn async_failure_reports_a_dismissal() {
        let (mut picker, probe) = controller(Script::Hold);
        let log = Log::default();

        picker
            .show(&PickerConfiguration::default(), on_selected(&log, "A"), on_dismissed(&log, "B"))
            .unwrap();
        probe.reporter().failed("window went away");

        assert_eq!(events(&log), vec![Event::Dismissed("B")]);
        assert_eq!(picker.state(), PickerState::Idle);
    }

    #[test]
    fn synchronous_failure_is_returned_without_callbacks() {
        let (mut picker, _probe) = controller(Script::Fail(PresentError::NoHostWindow));
        let log = Log::default();

        let result = picker.show(&PickerConfiguration::default(), on_selected(&log, "A"), on_dismissed(&log, "B"));

        assert!(matches!(
            result,
            Err(PickerError::PresentationFailed(PresentError::NoHostWindow))
        ));
        assert!(events(&log).is_empty());
        assert_eq!(picker.state(), PickerState::Idle);
    }

    #[test]
    fn controller_recovers_after_synchronous_failure() {
        let (mut picker, probe) = controller(Script::Fail(PresentError::Unsupported("test")));
        let log = Log::default();
        let config = PickerConfiguration::default();

        assert!(picker.show(&config, on_selected(&log, "A"), on_dismissed(&log, "B")).is_err());

        picker.presenter.script = Script::Hold;
        picker.show(&config, on_selected(&log, "C"), on_dismissed(&log, "D")).unwrap();
        probe.dismiss();
        assert_eq!(events(&log), vec![Event::Dismissed("D")]);
    }

    #[test]
    fn selection_reported_during_present_is_delivered_once() {
        let (mut picker, _probe) = controller(Script::SelectNow("#112233"));
        let log = Log::default();

        picker
            .show(&PickerConfiguration::default(), on_selected(&log, "A"), on_dismissed(&log, "B"))
            .unwrap();

        assert_eq!(events(&log), vec![Event::Selected("A", "#112233".to_string())]);
        assert_eq!(picker.state(), PickerState::Idle);
    }

    #[test]
    fn dropped_reporter_counts_as_dismissal() {
        let (mut picker, _probe) = controller(Script::DropReporter);
        let log = Log::default();

        picker
            .show(&PickerConfiguration::default(), on_selected(&log, "A"), on_dismissed(&log, "B"))
            .unwrap();

        assert_eq!(events(&log), vec![Event::Dismissed("B")]);
        assert_eq!(picker.state(), PickerState::Idle);
    }

    #[test]
    fn hide_dismisses_and_ignores_late_reports() {
        let (mut picker, probe) = controller(Script::Hold);
        let log = Log::default();

        picker
            .show(&PickerConfiguration::default(), on_selected(&log, "A"), on_dismissed(&log, "B"))
            .unwrap();
        picker.hide();

        assert_eq!(events(&log), vec![Event::Dismissed("B")]);
        assert_eq!(probe.hides.load(Ordering::SeqCst), 1);
        assert_eq!(picker.state(), PickerState::Idle);

        // The hidden dialog reports afterwards
        probe.select("#FFFFFF");
        assert_eq!(events(&log), vec![Event::Dismissed("B")]);
    }

    #[test]
    fn late_report_does_not_touch_the_next_session() {
        let (mut picker, probe) = controller(Script::Hold);
        let log = Log::default();
        let config = PickerConfiguration::default();

        picker.show(&config, on_selected(&log, "A"), on_dismissed(&log, "B")).unwrap();
        let stale = probe.reporter();
        picker.hide();

        picker.show(&config, on_selected(&log, "C"), on_dismissed(&log, "D")).unwrap();
        stale.selected("#000000");

        assert_eq!(events(&log), vec![Event::Dismissed("B")]);
        assert!(picker.is_presenting());

        probe.select("#FEDCBA");
        assert_eq!(
            events(&log),
            vec![Event::Dismissed("B"), Event::Selected("C", "#FEDCBA".to_string())]
        );
    }

    #[test]
    fn hide_when_idle_is_a_no_op() {
        let (mut picker, probe) = controller(Script::Hold);
        picker.hide();
        assert_eq!(probe.hides.load(Ordering::SeqCst), 0);
        assert_eq!(picker.state(), PickerState::Idle);
    }

    #[test]
    fn configuration_reaches_the_presenter_unchanged() {
        let (mut picker, probe) = controller(Script::Hold);
        let config = PickerConfiguration::new()
            .with_color("rgba(1, 2, 3, 0.5)")
            .with_title("Accent")
            .with_supports_alpha(false);

        picker.show_with(&config, |_| {}).unwrap();
        assert_eq!(probe.presented.lock().as_slice(), &[config.clone()]);
        probe.dismiss();
    }

    #[test]
    fn show_async_resolves_with_the_selection() {
        let (mut picker, probe) = controller(Script::Hold);

        let pending = picker.show_async(&PickerConfiguration::default()).unwrap();
        probe.select("#00FF00");

        let outcome = futures::executor::block_on(pending);
        assert_eq!(outcome, PickerOutcome::Selected(ColorResult::from("#00FF00")));
    }

    #[test]
    fn show_async_resolves_with_a_dismissal() {
        let (mut picker, probe) = controller(Script::Hold);

        let pending = picker.show_async(&PickerConfiguration::default()).unwrap();
        assert!(matches!(
            picker.show_async(&PickerConfiguration::default()),
            Err(PickerError::AlreadyPresenting)
        ));
        probe.dismiss();

        assert!(futures::executor::block_on(pending).is_dismissed());
    }

    #[test]
    fn session_ids_increase() {
        let (mut picker, probe) = controller(Script::Hold);

        let first = picker.show_async(&PickerConfiguration::default()).unwrap();
        probe.dismiss();
        let second = picker.show_async(&PickerConfiguration::default()).unwrap();
        assert!(second.session_id() > first.session_id());
        picker.hide();

        assert!(futures::executor::block_on(first).is_dismissed());
        assert!(futures::executor::block_on(second).is_dismissed());
    }
}
