use nudge_core::db::open_db_in_memory;
use nudge_core::{
    CancelError, CreateError, DeleteOutcome, NotificationHandle, NotificationScheduler,
    PermissionState, Reminder, ReminderManager, ReminderStore, ReminderValidationError,
    ScheduleError, ScheduleRequest, SqliteReminderStore, StoreError, StoreResult,
};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Call log shared between a test and the scheduler the manager owns.
#[derive(Default)]
struct SchedulerLog {
    schedule_calls: Vec<ScheduleRequest>,
    cancel_calls: Vec<NotificationHandle>,
    permission_requests: u32,
}

struct RecordingScheduler {
    log: Rc<RefCell<SchedulerLog>>,
    permission: PermissionState,
    request_outcome: PermissionState,
    fail_schedule: bool,
    fail_cancel: bool,
    physical: bool,
    issued_handles: u32,
}

impl RecordingScheduler {
    fn granted() -> (Self, Rc<RefCell<SchedulerLog>>) {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let scheduler = Self {
            log: Rc::clone(&log),
            permission: PermissionState::Granted,
            request_outcome: PermissionState::Granted,
            fail_schedule: false,
            fail_cancel: false,
            physical: true,
            issued_handles: 0,
        };
        (scheduler, log)
    }
}

impl NotificationScheduler for RecordingScheduler {
    fn permission_state(&self) -> PermissionState {
        self.permission
    }

    fn request_permission(&mut self) -> PermissionState {
        self.log.borrow_mut().permission_requests += 1;
        self.request_outcome
    }

    fn schedule(&mut self, request: &ScheduleRequest) -> Result<NotificationHandle, ScheduleError> {
        self.log.borrow_mut().schedule_calls.push(request.clone());
        if self.fail_schedule {
            return Err(ScheduleError::Backend("injected schedule failure".into()));
        }
        self.issued_handles += 1;
        Ok(NotificationHandle::new(format!(
            "handle-{}",
            self.issued_handles
        )))
    }

    fn cancel(&mut self, handle: &NotificationHandle) -> Result<(), CancelError> {
        self.log.borrow_mut().cancel_calls.push(handle.clone());
        if self.fail_cancel {
            return Err(CancelError::Backend("injected cancel failure".into()));
        }
        Ok(())
    }

    fn is_physical_device(&self) -> bool {
        self.physical
    }
}

/// In-memory store double whose saves can be made to fail on demand.
#[derive(Default)]
struct FlakyStore {
    snapshot: RefCell<Vec<Reminder>>,
    fail_saves: bool,
}

impl ReminderStore for FlakyStore {
    fn load(&self) -> StoreResult<Vec<Reminder>> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, reminders: &[Reminder]) -> StoreResult<()> {
        if self.fail_saves {
            return Err(StoreError::InvalidSnapshot("injected save failure".into()));
        }
        *self.snapshot.borrow_mut() = reminders.to_vec();
        Ok(())
    }
}

#[test]
fn empty_title_rejects_before_any_external_call() {
    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);

    for title in ["", "   ", "\t\n"] {
        let err = manager.create_reminder(title, "10").unwrap_err();
        assert!(matches!(
            err,
            CreateError::Validation(ReminderValidationError::EmptyTitle)
        ));
    }

    assert!(manager.list_reminders().is_empty());
    assert!(log.borrow().schedule_calls.is_empty());
}

#[test]
fn invalid_delay_rejects_before_any_external_call() {
    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);

    for delay in ["0", "-3", "10.5", "", "soon"] {
        let err = manager.create_reminder("Wake up", delay).unwrap_err();
        assert!(
            matches!(
                err,
                CreateError::Validation(ReminderValidationError::InvalidDelay { .. })
            ),
            "delay `{delay}` should be rejected"
        );
    }

    assert!(manager.list_reminders().is_empty());
    assert!(log.borrow().schedule_calls.is_empty());
}

#[test]
fn valid_create_prepends_record_with_scheduler_handle() {
    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);

    let before = now_ms();
    let outcome = manager.create_reminder("  Wake up  ", "10").unwrap();
    let after = now_ms();

    assert!(outcome.persisted);
    let list = manager.list_reminders();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0], outcome.reminder);
    assert_eq!(list[0].title, "Wake up");
    assert_eq!(list[0].delay_seconds, 10);
    assert_eq!(
        list[0].scheduled_handle,
        Some(NotificationHandle::new("handle-1"))
    );
    assert!(list[0].created_at >= before && list[0].created_at <= after);

    let log = log.borrow();
    assert_eq!(log.schedule_calls.len(), 1);
    let request = &log.schedule_calls[0];
    assert_eq!(request.title, "Wake up");
    assert!(request.body.contains("10 seconds"));
    // Absolute fire time: created_at + delay.
    assert_eq!(
        request.fire_at_epoch_ms,
        list[0].created_at + 10_000,
        "fire time must be the absolute creation moment plus the delay"
    );
}

#[test]
fn list_is_newest_first() {
    let (scheduler, _log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);

    manager.create_reminder("older", "10").unwrap();
    manager.create_reminder("newer", "20").unwrap();

    let titles: Vec<&str> = manager
        .list_reminders()
        .iter()
        .map(|entry| entry.title.as_str())
        .collect();
    assert_eq!(titles, ["newer", "older"]);
}

#[test]
fn schedule_failure_aborts_create_without_mutation() {
    let (mut scheduler, log) = RecordingScheduler::granted();
    scheduler.fail_schedule = true;
    let store = FlakyStore::default();
    let mut manager = ReminderManager::new(store, scheduler);

    let err = manager.create_reminder("Wake up", "10").unwrap_err();
    assert!(matches!(err, CreateError::Scheduling(_)));
    assert!(manager.list_reminders().is_empty());
    // The scheduler was asked once and refused; no retry happens.
    assert_eq!(log.borrow().schedule_calls.len(), 1);
}

#[test]
fn save_failure_after_schedule_keeps_in_memory_record() {
    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(
        FlakyStore {
            fail_saves: true,
            ..FlakyStore::default()
        },
        scheduler,
    );

    let outcome = manager.create_reminder("Wake up", "10").unwrap();

    // The session stays consistent with what will actually fire even though
    // the on-disk snapshot is stale.
    assert!(!outcome.persisted);
    assert_eq!(manager.list_reminders().len(), 1);
    assert_eq!(log.borrow().schedule_calls.len(), 1);
}

#[test]
fn deleting_absent_id_is_a_noop_with_no_cancel_call() {
    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);
    manager.create_reminder("keep me", "10").unwrap();

    let outcome = manager.delete_reminder(Uuid::new_v4());

    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert_eq!(manager.list_reminders().len(), 1);
    assert!(log.borrow().cancel_calls.is_empty());
}

#[test]
fn deleting_present_id_cancels_exactly_once_and_removes_it() {
    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);
    let kept = manager.create_reminder("keep", "10").unwrap().reminder;
    let doomed = manager.create_reminder("remove", "20").unwrap().reminder;

    let outcome = manager.delete_reminder(doomed.id);

    assert_eq!(outcome, DeleteOutcome::Removed { persisted: true });
    let list = manager.list_reminders();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, kept.id);

    let log = log.borrow();
    assert_eq!(log.cancel_calls.len(), 1);
    assert_eq!(Some(&log.cancel_calls[0]), doomed.scheduled_handle.as_ref());
}

#[test]
fn delete_is_idempotent_across_repeated_calls() {
    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);
    let created = manager.create_reminder("once", "10").unwrap().reminder;

    assert!(matches!(
        manager.delete_reminder(created.id),
        DeleteOutcome::Removed { .. }
    ));
    assert_eq!(manager.delete_reminder(created.id), DeleteOutcome::NotFound);

    assert!(manager.list_reminders().is_empty());
    assert_eq!(log.borrow().cancel_calls.len(), 1);
}

#[test]
fn cancel_failure_does_not_block_removal() {
    let (mut scheduler, log) = RecordingScheduler::granted();
    scheduler.fail_cancel = true;
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);
    let created = manager.create_reminder("stray", "10").unwrap().reminder;

    let outcome = manager.delete_reminder(created.id);

    assert_eq!(outcome, DeleteOutcome::Removed { persisted: true });
    assert!(manager.list_reminders().is_empty());
    assert_eq!(log.borrow().cancel_calls.len(), 1);
}

#[test]
fn initialize_recovers_persisted_list() {
    let conn = open_db_in_memory().unwrap();
    {
        let store = SqliteReminderStore::try_new(&conn).unwrap();
        let (scheduler, _log) = RecordingScheduler::granted();
        let mut manager = ReminderManager::new(store, scheduler);
        manager.create_reminder("survives restart", "30").unwrap();
    }

    // Fresh manager over the same database simulates a process restart.
    let store = SqliteReminderStore::try_new(&conn).unwrap();
    let (scheduler, _log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(store, scheduler);
    let report = manager.initialize();

    assert_eq!(report.loaded, 1);
    assert!(!report.store_degraded);
    assert_eq!(manager.list_reminders()[0].title, "survives restart");
}

#[test]
fn initialize_degrades_to_empty_list_on_corrupt_snapshot() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO snapshots (slot, payload, updated_at) VALUES ('reminders', '[{broken', 0);",
        [],
    )
    .unwrap();

    let store = SqliteReminderStore::try_new(&conn).unwrap();
    let (scheduler, _log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(store, scheduler);
    let report = manager.initialize();

    assert_eq!(report.loaded, 0);
    assert!(report.store_degraded);
    assert!(manager.list_reminders().is_empty());

    // The degraded start must not block later creates.
    manager.create_reminder("fresh start", "10").unwrap();
    assert_eq!(manager.list_reminders().len(), 1);
}

#[test]
fn initialize_prompts_only_when_permission_is_undetermined() {
    let (mut scheduler, log) = RecordingScheduler::granted();
    scheduler.permission = PermissionState::Undetermined;
    scheduler.request_outcome = PermissionState::Granted;
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);

    let report = manager.initialize();
    assert_eq!(report.permission, PermissionState::Granted);
    assert_eq!(log.borrow().permission_requests, 1);

    let (scheduler, log) = RecordingScheduler::granted();
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);
    let report = manager.initialize();
    assert_eq!(report.permission, PermissionState::Granted);
    assert_eq!(log.borrow().permission_requests, 0);
}

#[test]
fn initialize_surfaces_denied_permission_and_device_warning_non_fatally() {
    let (mut scheduler, _log) = RecordingScheduler::granted();
    scheduler.permission = PermissionState::Denied;
    scheduler.physical = false;
    let mut manager = ReminderManager::new(FlakyStore::default(), scheduler);

    let report = manager.initialize();

    assert_eq!(report.permission, PermissionState::Denied);
    assert!(!report.physical_device);

    // Denial is a warning, not a gate: creates still go through the
    // scheduler (known limitation, permission is not re-checked per create).
    manager.create_reminder("still tries", "10").unwrap();
    assert_eq!(manager.list_reminders().len(), 1);
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}
