//! Accept-everything scheduler for headless use.

use super::scheduler::{
    CancelError, NotificationScheduler, PermissionState, ScheduleError, ScheduleRequest,
};
use crate::model::reminder::NotificationHandle;
use log::debug;
use uuid::Uuid;

/// Scheduler that accepts every request and never delivers anything.
///
/// Used by the CLI smoke probe and by environments without a platform
/// notification service. Reports itself as a non-physical device so the
/// manager surfaces the reliability warning honestly.
#[derive(Debug, Default)]
pub struct NoopScheduler {
    scheduled: u64,
}

impl NotificationScheduler for NoopScheduler {
    fn permission_state(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn request_permission(&mut self) -> PermissionState {
        PermissionState::Granted
    }

    fn schedule(&mut self, request: &ScheduleRequest) -> Result<NotificationHandle, ScheduleError> {
        self.scheduled += 1;
        let handle = NotificationHandle::new(Uuid::new_v4().to_string());
        debug!(
            "event=noop_schedule module=sched status=ok handle={handle} fire_at={}",
            request.fire_at_epoch_ms
        );
        Ok(handle)
    }

    fn cancel(&mut self, handle: &NotificationHandle) -> Result<(), CancelError> {
        debug!("event=noop_cancel module=sched status=ok handle={handle}");
        Ok(())
    }

    fn is_physical_device(&self) -> bool {
        false
    }
}

impl NoopScheduler {
    /// Number of schedule calls accepted since construction.
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }
}
