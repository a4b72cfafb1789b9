//! Task Lifecycle Client
//!
//! Owns the single analysis task of an operator session: submission, the
//! polling loop and terminal resolution.
//!
//! ## Concurrency
//! - State lives behind one `std::sync::Mutex`, never held across `.await`
//! - Every submit and reset bumps an epoch; in-flight work captures the
//!   epoch it started under and drops its result if the epoch moved on
//! - The polling loop is a spawned task racing every sleep and request
//!   against a `watch` cancellation channel
//! - State changes are published on a `watch` channel for observers

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use auth::SessionHandle;
use kernel::id::SubmissionId;
use platform::{HttpError, RetryBudget};
use tokio::sync::watch;

use crate::application::config::PollConfig;
use crate::domain::entities::{AnalysisTask, TaskFailure, TaskSnapshot, TaskUpdate};
use crate::domain::gateway::AnalysisGateway;
use crate::domain::state::LifecycleState;
use crate::domain::value_objects::{ImagePayload, TaskId};
use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Default)]
struct Inner {
    state: LifecycleState,
    /// Bumped on every submit and reset
    epoch: u64,
    submission: Option<SubmissionId>,
    task: Option<AnalysisTask>,
    /// Failure of a submission the backend never accepted
    submit_error: Option<TaskFailure>,
    cancel: Option<watch::Sender<bool>>,
}

struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<LifecycleState>,
}

impl Shared {
    fn new() -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Idle);
        Self {
            inner: Mutex::new(Inner::default()),
            state_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, inner: &mut Inner, next: LifecycleState) {
        let prev = inner.state;
        if prev == next {
            return;
        }
        debug_assert!(prev.can_transition_to(next), "{prev} -> {next}");
        inner.state = next;
        self.state_tx.send_replace(next);

        let task_id = inner.task.as_ref().map(|t| t.id.as_str()).unwrap_or("-");
        tracing::info!(from = %prev, to = %next, task_id, "Task state changed");
    }

    /// Apply a poll answer under `epoch`; returns true to keep polling
    fn apply_update(&self, epoch: u64, update: TaskUpdate) -> bool {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            tracing::debug!(epoch, "Discarding poll result for superseded task");
            return false;
        }
        let Some(task) = inner.task.as_mut() else {
            return false;
        };
        if !task.apply(update) {
            return false;
        }
        let next = LifecycleState::from(task.status);
        let records = task.result().map(<[_]>::len);
        let failure = task.error().map(|e| e.message.clone());

        if next.is_terminal() {
            inner.cancel = None;
        }
        self.transition(&mut inner, next);

        if let Some(count) = records {
            tracing::info!(records = count, "Analysis completed");
        }
        if let Some(message) = failure {
            tracing::error!(reason = %message, "Analysis failed on the backend");
        }
        !next.is_terminal()
    }

    /// Terminate the task under `epoch` with a client-side failure
    fn fail(&self, epoch: u64, err: &AnalysisError) -> bool {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            return false;
        }
        let Some(task) = inner.task.as_mut() else {
            return false;
        };
        if !task.fail(err.to_failure()) {
            return false;
        }
        inner.cancel = None;
        self.transition(&mut inner, LifecycleState::Failed);
        true
    }

    fn cancel(&self, inner: &mut Inner) {
        inner.epoch += 1;
        if let Some(cancel) = inner.cancel.take() {
            let _ = cancel.send(true);
        }
    }
}

/// Abandons the submission if the `submit` future is dropped mid-flight
struct SubmitGuard<'a> {
    shared: &'a Shared,
    epoch: u64,
    armed: bool,
}

impl SubmitGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.shared.lock();
        if inner.epoch == self.epoch && inner.state == LifecycleState::Submitting {
            self.shared.cancel(&mut inner);
            inner.submission = None;
            self.shared.transition(&mut inner, LifecycleState::Idle);
            tracing::warn!("Submission abandoned before the backend answered");
        }
    }
}

/// Lifecycle controller for one operator session
///
/// At most one task exists at a time. A terminal task stays visible until
/// [`reset`](Self::reset) or the next [`submit`](Self::submit).
pub struct TaskLifecycleClient<G> {
    gateway: Arc<G>,
    session: SessionHandle,
    config: Arc<PollConfig>,
    shared: Arc<Shared>,
}

impl<G> TaskLifecycleClient<G>
where
    G: AnalysisGateway + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, session: SessionHandle, config: Arc<PollConfig>) -> Self {
        Self {
            gateway,
            session,
            config,
            shared: Arc::new(Shared::new()),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.lock().state
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.shared.state_tx.subscribe()
    }

    pub fn task(&self) -> Option<AnalysisTask> {
        self.shared.lock().task.clone()
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        let inner = self.shared.lock();
        match &inner.task {
            Some(task) => TaskSnapshot {
                state: inner.state,
                submission: Some(task.submission),
                task_id: Some(task.id.clone()),
                submitted_at: Some(task.submitted_at),
                result: task.result().map(<[_]>::to_vec),
                error: task.error().cloned(),
            },
            None => TaskSnapshot {
                state: inner.state,
                submission: inner.submission,
                error: inner.submit_error.clone(),
                ..TaskSnapshot::idle()
            },
        }
    }

    /// Submit an image and start polling
    ///
    /// Returns once the backend has accepted the image. Fails without any
    /// network call when no token is held or a task is still in flight.
    pub async fn submit(&self, image: ImagePayload) -> AnalysisResult<TaskId> {
        let Some(token) = self.session.current_token() else {
            let err = AnalysisError::Unauthenticated;
            err.log();
            return Err(err);
        };

        let (epoch, submission, mut cancel) = self.begin_submission()?;
        let mut guard = SubmitGuard {
            shared: &self.shared,
            epoch,
            armed: true,
        };

        tracing::info!(
            submission = %submission,
            file = image.file_name(),
            bytes = image.len(),
            "Submitting image for analysis"
        );

        let outcome = tokio::select! {
            res = self.gateway.submit(&token, &image) => res,
            _ = cancel.changed() => {
                guard.disarm();
                tracing::info!(submission = %submission, "Submission cancelled");
                return Err(AnalysisError::Cancelled);
            }
        };
        guard.disarm();

        match outcome {
            Ok(task_id) => self.accept(epoch, submission, task_id, cancel),
            Err(err) => Err(self.reject(epoch, err)),
        }
    }

    /// Cancel any submission or polling and return to `idle`
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        self.shared.cancel(&mut inner);
        let prev = inner.state;
        let discarded = inner.task.as_ref().map(|t| t.id.to_string());
        self.shared.transition(&mut inner, LifecycleState::Idle);
        inner.task = None;
        inner.submission = None;
        inner.submit_error = None;
        drop(inner);

        tracing::info!(from = %prev, discarded = ?discarded, "Task lifecycle reset");
    }

    /// Resolve once the task is terminal, or immediately when idle
    pub async fn wait_for_terminal(&self) -> TaskSnapshot {
        let mut rx = self.subscribe();
        loop {
            let state = *rx.borrow_and_update();
            if !state.is_busy() {
                return self.snapshot();
            }
            if rx.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }

    fn begin_submission(&self) -> AnalysisResult<(u64, SubmissionId, watch::Receiver<bool>)> {
        let mut inner = self.shared.lock();
        if inner.state.is_busy() {
            let err = AnalysisError::TaskInProgress(inner.state);
            err.log();
            return Err(err);
        }

        // A terminal task from a previous submission is discarded here
        self.shared.cancel(&mut inner);
        inner.task = None;
        inner.submit_error = None;
        let submission = SubmissionId::new();
        inner.submission = Some(submission);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        inner.cancel = Some(cancel_tx);
        self.shared.transition(&mut inner, LifecycleState::Submitting);

        Ok((inner.epoch, submission, cancel_rx))
    }

    fn accept(
        &self,
        epoch: u64,
        submission: SubmissionId,
        task_id: TaskId,
        cancel: watch::Receiver<bool>,
    ) -> AnalysisResult<TaskId> {
        {
            let mut inner = self.shared.lock();
            if inner.epoch != epoch {
                return Err(AnalysisError::Cancelled);
            }
            inner.task = Some(AnalysisTask::new(submission, task_id.clone()));
            self.shared.transition(&mut inner, LifecycleState::Pending);
        }

        tracing::info!(submission = %submission, task_id = %task_id, "Task accepted");

        let poll = PollLoop {
            shared: Arc::clone(&self.shared),
            gateway: Arc::clone(&self.gateway),
            session: self.session.clone(),
            config: Arc::clone(&self.config),
            epoch,
            task_id: task_id.clone(),
            cancel,
        };
        tokio::spawn(poll.run());

        Ok(task_id)
    }

    fn reject(&self, epoch: u64, err: AnalysisError) -> AnalysisError {
        if err.is_unauthorized() {
            self.session.invalidate();
        }

        let mut inner = self.shared.lock();
        if inner.epoch != epoch {
            return AnalysisError::Cancelled;
        }
        inner.submit_error = Some(err.to_failure());
        inner.cancel = None;
        self.shared.transition(&mut inner, LifecycleState::Failed);
        drop(inner);

        err.log();
        err
    }
}

impl<G> Drop for TaskLifecycleClient<G> {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        self.shared.cancel(&mut inner);
    }
}

struct PollLoop<G> {
    shared: Arc<Shared>,
    gateway: Arc<G>,
    session: SessionHandle,
    config: Arc<PollConfig>,
    epoch: u64,
    task_id: TaskId,
    cancel: watch::Receiver<bool>,
}

impl<G> PollLoop<G>
where
    G: AnalysisGateway + Sync + 'static,
{
    async fn run(self) {
        let PollLoop {
            shared,
            gateway,
            session,
            config,
            epoch,
            task_id,
            mut cancel,
        } = self;

        let mut budget = RetryBudget::new(config.retry.clone());
        let mut delay = config.interval;
        let mut attempt: u64 = 0;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.changed() => {
                    tracing::debug!(task_id = %task_id, "Polling cancelled");
                    return;
                }
            }

            let Some(token) = session.current_token() else {
                finish(&shared, epoch, AnalysisError::Unauthenticated);
                return;
            };

            attempt += 1;
            tracing::debug!(task_id = %task_id, attempt, "Polling task status");

            let polled = tokio::select! {
                res = tokio::time::timeout(config.request_timeout, gateway.poll(&token, &task_id)) => {
                    res.unwrap_or_else(|_| Err(AnalysisError::Http(HttpError::Timeout)))
                }
                _ = cancel.changed() => {
                    tracing::debug!(task_id = %task_id, attempt, "Polling cancelled mid-request");
                    return;
                }
            };

            match polled {
                Ok(update) => {
                    budget.reset();
                    delay = config.interval;
                    tracing::debug!(task_id = %task_id, status = ?update.status(), "Poll answered");
                    if !shared.apply_update(epoch, update) {
                        return;
                    }
                }
                Err(err) if err.is_transient() => match budget.record_failure() {
                    Some(backoff) => {
                        tracing::warn!(
                            task_id = %task_id,
                            attempt,
                            failures = budget.failures(),
                            delay_ms = backoff.as_millis() as u64,
                            error = %err,
                            "Transient poll failure, backing off"
                        );
                        delay = backoff;
                    }
                    None => {
                        let attempts = budget.failures();
                        finish(&shared, epoch, AnalysisError::PollExhausted { attempts });
                        return;
                    }
                },
                Err(err) => {
                    if err.is_unauthorized() {
                        session.invalidate();
                    }
                    finish(&shared, epoch, err);
                    return;
                }
            }
        }
    }
}

fn finish(shared: &Shared, epoch: u64, err: AnalysisError) {
    if shared.fail(epoch, &err) {
        err.log();
    }
}
