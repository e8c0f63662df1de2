//! Reminder lifecycle manager.
//!
//! # Responsibility
//! - Orchestrate create / delete / list over the store and the scheduler.
//! - Enforce the ordered pipeline: validate, external call, in-memory
//!   mutation, write-through persist.
//!
//! # Invariants
//! - The manager exclusively owns the in-memory list; callers only ever see
//!   read-only snapshots through `list_reminders`.
//! - Validation happens before any external call, so rejected input has no
//!   side effects.
//! - The list is newest-first; every mutation is followed by a persist
//!   attempt (write-through).
//! - Cancellation is best-effort: a failed cancel never blocks removal, so a
//!   stray notification may still fire after its reminder is gone. Accepted
//!   tradeoff, logged, never rolled back.
//! - A failed persist after a successful schedule keeps the in-memory record:
//!   the running session stays consistent with what will actually fire, the
//!   on-disk snapshot is stale until the next successful persist.

use crate::model::reminder::{
    now_epoch_ms, parse_delay_seconds, validate_title, Reminder, ReminderId,
    ReminderValidationError,
};
use crate::sched::{NotificationScheduler, PermissionState, ScheduleError, ScheduleRequest};
use crate::store::reminder_store::ReminderStore;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure modes of [`ReminderManager::create_reminder`].
#[derive(Debug)]
pub enum CreateError {
    /// Input rejected before any external call.
    Validation(ReminderValidationError),
    /// The external scheduler refused or failed the request; nothing was
    /// mutated and nothing is retried.
    Scheduling(ScheduleError),
}

impl Display for CreateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Scheduling(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CreateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Scheduling(err) => Some(err),
        }
    }
}

impl From<ReminderValidationError> for CreateError {
    fn from(value: ReminderValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result envelope for a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    /// The record now at the head of the list.
    pub reminder: Reminder,
    /// Whether the write-through persist succeeded. `false` means the
    /// notification is scheduled and tracked in memory, but the on-disk
    /// snapshot is stale until the next successful persist.
    pub persisted: bool,
}

/// Result envelope for a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed {
        /// Whether the write-through persist succeeded.
        persisted: bool,
    },
    /// No reminder with that id exists; nothing was done (idempotent).
    NotFound,
}

/// Startup report from [`ReminderManager::initialize`].
///
/// Every field is advisory; initialization itself never fails. The two
/// halves (store load, permission resolution) are independent and either
/// may degrade without blocking the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Number of reminders recovered from the store.
    pub loaded: usize,
    /// True when the persisted snapshot was missing its read path entirely
    /// (load error); the manager started from an empty list.
    pub store_degraded: bool,
    /// Terminal permission state after prompting if needed.
    pub permission: PermissionState,
    /// False on emulators/headless hosts where timed delivery may be
    /// unreliable.
    pub physical_device: bool,
}

/// Orchestrates the reminder lifecycle over a store and a scheduler.
///
/// All mutating operations take `&mut self`, so the single-writer model is
/// enforced by the borrow checker; no locking, no timeouts, operations run
/// to completion or to their first failure.
pub struct ReminderManager<S: ReminderStore, N: NotificationScheduler> {
    store: S,
    scheduler: N,
    reminders: Vec<Reminder>,
}

impl<S: ReminderStore, N: NotificationScheduler> ReminderManager<S, N> {
    /// Creates a manager with an empty in-memory list.
    ///
    /// Call [`Self::initialize`] before anything else to recover persisted
    /// state and resolve the notification permission.
    pub fn new(store: S, scheduler: N) -> Self {
        Self {
            store,
            scheduler,
            reminders: Vec::new(),
        }
    }

    /// Recovers persisted reminders and resolves notification permission.
    ///
    /// # Contract
    /// - A missing or corrupt snapshot is not fatal: the manager degrades to
    ///   an empty list and reports it.
    /// - Permission denial is not fatal and is not re-checked before later
    ///   creates.
    pub fn initialize(&mut self) -> InitReport {
        let (loaded, store_degraded) = match self.store.load() {
            Ok(reminders) => {
                let count = reminders.len();
                self.reminders = reminders;
                (count, false)
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=manager status=error error={err}; starting empty"
                );
                self.reminders = Vec::new();
                (0, true)
            }
        };

        let mut permission = self.scheduler.permission_state();
        if permission == PermissionState::Undetermined {
            permission = self.scheduler.request_permission();
        }
        if !permission.is_granted() {
            warn!("event=permission module=manager status=denied");
        }

        let physical_device = self.scheduler.is_physical_device();
        if !physical_device {
            warn!("event=device_check module=manager status=unreliable physical=false");
        }

        info!(
            "event=manager_init module=manager status=ok loaded={loaded} degraded={store_degraded} permission={permission}"
        );

        InitReport {
            loaded,
            store_degraded,
            permission,
            physical_device,
        }
    }

    /// Creates a reminder from raw user input.
    ///
    /// Pipeline: validate both fields, schedule a one-shot notification at an
    /// absolute fire time (now + delay), prepend the new record, persist
    /// write-through.
    ///
    /// # Errors
    /// - `Validation` before any external call; list and scheduler untouched.
    /// - `Scheduling` when the scheduler refuses; list untouched, no retry.
    pub fn create_reminder(
        &mut self,
        title: &str,
        seconds_text: &str,
    ) -> Result<CreateOutcome, CreateError> {
        let title = validate_title(title)?;
        let delay_seconds = parse_delay_seconds(seconds_text)?;

        let created_at = now_epoch_ms();
        let request = ScheduleRequest {
            title: title.clone(),
            body: notification_body(delay_seconds),
            // Absolute fire time: immune to drift if the platform defers or
            // internally retries the scheduling call.
            fire_at_epoch_ms: created_at + i64::from(delay_seconds) * 1000,
        };

        let handle = self.scheduler.schedule(&request).map_err(|err| {
            warn!("event=schedule module=manager status=error error={err}");
            CreateError::Scheduling(err)
        })?;

        let reminder = Reminder::new(title, delay_seconds, handle, created_at);
        self.reminders.insert(0, reminder.clone());
        let persisted = self.persist("create");

        info!(
            "event=reminder_created module=manager status=ok id={} delay_s={delay_seconds} persisted={persisted}",
            reminder.id
        );

        Ok(CreateOutcome {
            reminder,
            persisted,
        })
    }

    /// Deletes a reminder by id, cancelling its scheduled notification
    /// best-effort.
    ///
    /// An absent id is a no-op and issues no scheduler call, which makes
    /// repeated deletes idempotent. Any interactive confirmation belongs to
    /// the caller.
    pub fn delete_reminder(&mut self, id: ReminderId) -> DeleteOutcome {
        let Some(position) = self.reminders.iter().position(|entry| entry.id == id) else {
            debug!("event=reminder_delete module=manager status=noop id={id}");
            return DeleteOutcome::NotFound;
        };

        if let Some(handle) = self.reminders[position].scheduled_handle.clone() {
            if let Err(err) = self.scheduler.cancel(&handle) {
                // Removal proceeds regardless; the stray notification may
                // still fire.
                warn!(
                    "event=cancel module=manager status=error id={id} handle={handle} error={err}"
                );
            }
        }

        self.reminders.remove(position);
        let persisted = self.persist("delete");

        info!("event=reminder_deleted module=manager status=ok id={id} persisted={persisted}");
        DeleteOutcome::Removed { persisted }
    }

    /// Current reminder list, newest-first. Pure read, no external calls.
    pub fn list_reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    fn persist(&self, op: &str) -> bool {
        match self.store.save(&self.reminders) {
            Ok(()) => true,
            Err(err) => {
                // Write-through is best-effort: memory stays the session's
                // source of truth, the snapshot heals on the next save.
                warn!("event=persist module=manager status=error op={op} error={err}");
                false
            }
        }
    }
}

fn notification_body(delay_seconds: u32) -> String {
    format!("You asked to be reminded {delay_seconds} seconds after creating this.")
}
