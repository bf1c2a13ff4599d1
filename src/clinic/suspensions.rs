//! Donor suspensions.

use chrono::NaiveDate;

use crate::error::{SchedulerError, SchedulerResult};
use crate::identity::Principal;
use crate::models::{NewSuspension, RecordId, Suspension};
use crate::store::{Store, atomically};

/// Suspends a donor and raises their suspended flag.
pub fn suspend_donor(
    store: &mut dyn Store,
    suspension: NewSuspension,
    actor: &Principal,
) -> SchedulerResult<Suspension> {
    if suspension.duration_months == 0 {
        return Err(SchedulerError::validation(
            "duration_months",
            "must be at least one month",
        ));
    }
    if suspension.reason.trim().is_empty() {
        return Err(SchedulerError::validation("reason", "must not be empty"));
    }

    let mut donor = store.get_donor(suspension.donor_id)?;
    atomically(store, |store| {
        let created = store.create_suspension(suspension, actor.id)?;
        if !donor.is_suspended {
            donor.is_suspended = true;
            store.update_donor(donor)?;
        }
        Ok(created)
    })
}

/// Ends a suspension today.
///
/// The donor's suspended flag is cleared unless another suspension is still
/// in force.
pub fn end_suspension(
    store: &mut dyn Store,
    id: RecordId,
    today: NaiveDate,
) -> SchedulerResult<Suspension> {
    let mut suspension = store.get_suspension(id)?;
    if !suspension.is_active {
        return Err(SchedulerError::conflict(format!(
            "suspension {} has already ended",
            id
        )));
    }

    suspension.is_active = false;
    suspension.end_date = today;
    atomically(store, |store| {
        let ended = store.update_suspension(suspension)?;

        let still_suspended = store
            .list_suspensions(Some(ended.donor_id))
            .iter()
            .any(|s| s.is_in_force(today));
        if !still_suspended {
            let mut donor = store.get_donor(ended.donor_id)?;
            if donor.is_suspended {
                donor.is_suspended = false;
                store.update_donor(donor)?;
            }
        }
        Ok(ended)
    })
}
