//! The one-shot notifier.
//!
//! A [`Notifier`] owns a single collect-and-notify run. `mount` schedules the
//! run after the configured debounce; `unmount` (or dropping the notifier)
//! cancels it if it has not started. A guard set before the first suspension
//! point keeps the run from executing more than once, however many times the
//! host mounts or calls [`Notifier::collect_and_notify`] directly.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::state::{DispatchOutcome, DispatchState};
use crate::config::NotifierConfig;
use crate::context::{snapshot, PageContext};
use crate::error_handling::{InitializationError, NotifyError};
use crate::initialization::{init_collaborators, Collaborators};
use crate::message::{panic_message, CustomFormatter, MessageTemplate};
use crate::record::{merge, VisitorRecord};

/// Called with the assembled record after a successful delivery.
pub type SuccessCallback = Arc<dyn Fn(&VisitorRecord) + Send + Sync>;

/// Called with the pipeline error after a failed run.
pub type ErrorCallback = Arc<dyn Fn(&NotifyError) + Send + Sync>;

/// Builder for [`Notifier`].
///
/// # Examples
///
/// ```no_run
/// use notigram::{Notifier, NotifierConfig, PageContext};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let page = PageContext::from_url("https://example.com/pricing", None, "Mozilla/5.0 ...");
/// let notifier = Notifier::builder(NotifierConfig::new("123456:token", "-100200300"), page)
///     .on_success(|record| println!("notified about {:?}", record.ip))
///     .on_error(|err| eprintln!("notification failed: {}", err))
///     .build()?;
///
/// notifier.mount();
/// notifier.wait().await;
/// # Ok(())
/// # }
/// ```
pub struct NotifierBuilder {
    config: NotifierConfig,
    page: PageContext,
    collaborators: Option<Collaborators>,
    custom_message: Option<CustomFormatter>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl NotifierBuilder {
    /// Replaces the HTTP-backed collaborators, e.g. with test doubles.
    pub fn collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = Some(collaborators);
        self
    }

    /// Replaces the built-in formatter. The field selection is ignored.
    pub fn custom_message<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&VisitorRecord) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.custom_message = Some(Arc::new(formatter));
        self
    }

    /// Registers a callback run after a successful delivery.
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&VisitorRecord) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Registers a callback run after a failed run.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&NotifyError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Builds the notifier.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] if no collaborators were supplied and
    /// the configuration is invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<Notifier, InitializationError> {
        let collaborators = match self.collaborators {
            Some(collaborators) => collaborators,
            None => init_collaborators(&self.config)?,
        };
        let template = match self.custom_message {
            Some(formatter) => MessageTemplate::Custom(formatter),
            None => MessageTemplate::Fields(self.config.fields.clone()),
        };

        Ok(Notifier {
            inner: Arc::new(Inner {
                config: self.config,
                page: self.page,
                collaborators,
                template,
                on_success: self.on_success,
                on_error: self.on_error,
                fired: AtomicBool::new(false),
                state: Mutex::new(DispatchState::Idle),
            }),
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
        })
    }
}

/// State shared between the notifier and its scheduled task.
struct Inner {
    config: NotifierConfig,
    page: PageContext,
    collaborators: Collaborators,
    template: MessageTemplate,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    /// One-shot guard; set before the first `.await` of a run
    fired: AtomicBool,
    state: Mutex<DispatchState>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, next: DispatchState) {
        *self.state() = next;
    }

    /// Claims the single run. Synchronous, so no re-entrant trigger can slip in.
    fn begin(&self) -> bool {
        let mut state = self.state();
        if self.config.disabled
            || matches!(*state, DispatchState::Canceled | DispatchState::Disabled)
        {
            return false;
        }
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        *state = DispatchState::Collecting;
        true
    }

    async fn run(&self) -> DispatchOutcome {
        if !self.begin() {
            debug!("Visitor notification skipped (state: {:?})", *self.state());
            return DispatchOutcome::Skipped;
        }

        info!("Collecting visitor data");
        let result = match AssertUnwindSafe(self.pipeline()).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(NotifyError::Panicked(panic_message(panic.as_ref()))),
        };
        match result {
            Ok(record) => {
                self.set_state(DispatchState::Dispatched);
                info!(
                    "Visitor notification delivered (ip: {}, page: {})",
                    record.ip.as_deref().unwrap_or("unknown"),
                    record.page.as_deref().unwrap_or("unknown")
                );
                if let Some(callback) = &self.on_success {
                    guard_callback("on_success", || callback(&record));
                }
                DispatchOutcome::Dispatched(record)
            }
            Err(e) => {
                self.set_state(DispatchState::Failed);
                error!("Visitor notification failed: {}", e);
                if let Some(callback) = &self.on_error {
                    guard_callback("on_error", || callback(&e));
                }
                DispatchOutcome::Failed(e)
            }
        }
    }

    async fn pipeline(&self) -> Result<VisitorRecord, NotifyError> {
        let geo = match self.collaborators.identity.resolve().await {
            Ok(profile) => Some(profile),
            Err(e) if self.config.degrade_on_lookup_failure => {
                warn!("Identity lookup failed, sending context-only message: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        let context = snapshot(&self.page, self.collaborators.agent_parser.as_ref());
        let record = merge(geo, context);

        let text = self.template.render(&record)?;
        let parse_mode = self.template.parse_mode(self.config.parse_mode);
        self.collaborators.sender.send(&text, parse_mode).await?;

        Ok(record)
    }
}

/// Runs a caller callback, containing any panic it raises.
fn guard_callback(name: &str, callback: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        error!("{} callback panicked", name);
    }
}

/// One-shot, debounceable, cancelable visitor notifier.
///
/// Each instance fires at most once. Dropping the notifier cancels a pending
/// fire; a run that has already started completes in the background.
pub struct Notifier {
    inner: Arc<Inner>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Notifier {
    /// Starts building a notifier for one page visit.
    pub fn builder(config: NotifierConfig, page: PageContext) -> NotifierBuilder {
        NotifierBuilder {
            config,
            page,
            collaborators: None,
            custom_message: None,
            on_success: None,
            on_error: None,
        }
    }

    /// Signals the lifecycle start: schedules the run after the debounce.
    ///
    /// Does nothing when disabled, already mounted, or already fired. Must be
    /// called from within a Tokio runtime; outside one the call is logged and
    /// ignored.
    ///
    /// Returns `true` if a run was scheduled by this call.
    pub fn mount(&self) -> bool {
        let mut state = self.inner.state();
        if *state != DispatchState::Idle {
            debug!("Notifier already mounted (state: {:?})", *state);
            return false;
        }
        if self.inner.config.disabled {
            *state = DispatchState::Disabled;
            debug!("Notifier disabled; nothing scheduled");
            return false;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!("Cannot schedule visitor notification: {}", e);
                return false;
            }
        };

        *state = DispatchState::Scheduled;
        drop(state);

        let inner = Arc::clone(&self.inner);
        let cancel = self.cancel.clone();
        let debounce = self.inner.config.debounce;
        debug!("Visitor notification scheduled in {:?}", debounce);

        let task = handle.spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Scheduled visitor notification canceled");
                }
                _ = tokio::time::sleep(debounce) => {
                    inner.run().await;
                }
            }
        });
        *self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(task);
        true
    }

    /// Signals teardown: cancels a scheduled run that has not started.
    ///
    /// Unmounting before `mount` also cancels, so neither a later `mount` nor
    /// a direct call can fire. A run already collecting is not interrupted.
    pub fn unmount(&self) {
        let mut state = self.inner.state();
        self.cancel.cancel();
        if matches!(*state, DispatchState::Idle | DispatchState::Scheduled) {
            *state = DispatchState::Canceled;
            debug!("Notifier unmounted before firing");
        }
    }

    /// Runs the pipeline now, bypassing the schedule.
    ///
    /// Returns [`DispatchOutcome::Skipped`] if the notifier already fired, was
    /// canceled, or is disabled.
    pub async fn collect_and_notify(&self) -> DispatchOutcome {
        self.inner.run().await
    }

    /// Waits for the scheduled task, if any, to finish.
    pub async fn wait(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Visitor notification task ended abnormally: {}", e);
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DispatchState {
        *self.inner.state()
    }

    /// True once a run has claimed the one-shot guard.
    pub fn has_fired(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("state", &self.state())
            .field("fired", &self.has_fired())
            .field("template", &self.inner.template)
            .finish_non_exhaustive()
    }
}
