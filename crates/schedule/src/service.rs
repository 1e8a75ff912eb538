//! The day/week planning service.
//!
//! Implements the per-(user, date) state machine: clean days return their
//! persisted entries untouched; dirty days are replanned — protected
//! entries kept, removable entries deleted and regenerated by the greedy
//! planner — and flipped clean on success. The whole replan-and-persist
//! sequence runs under the contention retry wrapper, so a failed attempt
//! leaves the day dirty and the next read repeats the computation.

use std::sync::Arc;

use chrono::Duration;

use tempo_core::clock::{self, UserProfile};
use tempo_core::days::DirtyReason;
use tempo_core::entries::{partition_protected, DayKind};
use tempo_core::error::CoreError;
use tempo_core::planner::{plan_day, PlanRequest};
use tempo_core::types::{DayDate, DbId, Timestamp};
use tempo_core::view::{assemble_day, DayView, WeekView};

use crate::retry::{with_contention_retry, RetryPolicy};
use crate::store::{DayDefaults, Store};

/// Request-driven planning operations over a store.
pub struct ScheduleService<S> {
    store: Arc<S>,
    retry: RetryPolicy,
}

impl<S: Store> ScheduleService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_retry(store, RetryPolicy::default())
    }

    pub fn with_retry(store: Arc<S>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// The assembled schedule for one date (today when absent), planning
    /// it first if stale.
    pub async fn day_view(
        &self,
        user_id: DbId,
        date: Option<DayDate>,
        now: Timestamp,
    ) -> Result<DayView, CoreError> {
        let profile = self.store.profile(user_id).await?;
        let target = date.unwrap_or_else(|| clock::local_date(now, profile.tz()));
        self.ensure_day_planned(user_id, target, &profile, now).await
    }

    /// Seven consecutive days starting at the week containing `start_date`
    /// (today when absent), each planned independently in date order.
    pub async fn week_view(
        &self,
        user_id: DbId,
        start_date: Option<DayDate>,
        now: Timestamp,
    ) -> Result<WeekView, CoreError> {
        let profile = self.store.profile(user_id).await?;
        let base = start_date.unwrap_or_else(|| clock::local_date(now, profile.tz()));
        let week_start = clock::week_start(base, profile.first_day_of_week);

        let mut days = Vec::with_capacity(7);
        for offset in 0..7 {
            let date = week_start + Duration::days(offset);
            days.push(self.ensure_day_planned(user_id, date, &profile, now).await?);
        }

        Ok(WeekView {
            start_date: week_start,
            end_date: week_start + Duration::days(6),
            timezone: profile.timezone.clone(),
            days,
        })
    }

    /// Toggle an entry's pinned/locked flags, then immediately replan its
    /// date so the protected capacity is excluded from re-allocation.
    /// Returns the refreshed day view.
    pub async fn update_entry_flags(
        &self,
        user_id: DbId,
        entry_id: DbId,
        pinned: Option<bool>,
        locked: Option<bool>,
        now: Timestamp,
    ) -> Result<DayView, CoreError> {
        if pinned.is_none() && locked.is_none() {
            return Err(CoreError::Validation(
                "Pinned or locked flag is required.".to_string(),
            ));
        }

        let profile = self.store.profile(user_id).await?;
        let entry = self
            .store
            .entry(user_id, entry_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "schedule entry",
                id: entry_id,
            })?;

        self.store
            .set_entry_flags(user_id, entry_id, pinned, locked)
            .await?;

        let reason = if pinned.is_some() {
            DirtyReason::PinChanged
        } else {
            DirtyReason::LockChanged
        };
        self.store
            .mark_day_dirty(user_id, entry.date, &profile.timezone, reason)
            .await?;

        self.ensure_day_planned(user_id, entry.date, &profile, now).await
    }

    /// Plan one date under the contention retry wrapper.
    async fn ensure_day_planned(
        &self,
        user_id: DbId,
        date: DayDate,
        profile: &UserProfile,
        now: Timestamp,
    ) -> Result<DayView, CoreError> {
        with_contention_retry(&self.retry, || self.plan_pass(user_id, date, profile, now))
            .await
    }

    /// One replan attempt: the full read-partition-compute-persist pass.
    async fn plan_pass(
        &self,
        user_id: DbId,
        date: DayDate,
        profile: &UserProfile,
        now: Timestamp,
    ) -> Result<DayView, CoreError> {
        let tz = profile.tz();
        let today = clock::local_date(now, tz);
        let is_today = date == today;
        let is_past = date < today;
        let cutoff = if is_today {
            Some(clock::minute_of_day(now, tz))
        } else {
            None
        };

        let defaults = DayDefaults {
            timezone: Some(profile.timezone.clone()),
            cutoff_minute: cutoff,
        };
        let day = self
            .store
            .find_or_create_day(user_id, date, &defaults)
            .await?;

        // Today's snapshot is refreshed on every evaluation, clean or not.
        if let Some(cutoff_minute) = cutoff {
            self.store
                .set_today_snapshot(user_id, date, &profile.timezone, cutoff_minute)
                .await?;
        }
        let view_cutoff = cutoff.or(day.cutoff_minute);

        let slots = self
            .store
            .slots_for_weekday(user_id, clock::weekday_number(date))
            .await?;
        let existing = self.store.entries_for_day(user_id, date).await?;

        // Past dates are frozen history: no replan, no dirty clearing.
        if is_past {
            return Ok(assemble_day(
                date,
                day.cutoff_minute,
                &slots,
                &existing,
                vec![],
                vec![],
            ));
        }

        if !day.dirty {
            tracing::debug!(user_id, %date, "Day is clean, returning persisted entries");
            return Ok(assemble_day(
                date,
                view_cutoff,
                &slots,
                &existing,
                vec![],
                vec![],
            ));
        }

        let kind = match cutoff {
            Some(cutoff) => DayKind::Today { cutoff },
            None => DayKind::Future,
        };
        let split = partition_protected(&existing, kind);
        if !split.removable_ids.is_empty() {
            self.store.delete_entries(&split.removable_ids).await?;
        }

        let tasks = self.store.schedulable_tasks(user_id).await?;
        let plan = plan_day(&PlanRequest {
            date,
            today,
            cutoff_minute: cutoff,
            tz,
            slots: &slots,
            protected: &split.protected,
            tasks: &tasks,
        });

        if !plan.new_entries.is_empty() {
            self.store
                .insert_entries(user_id, date, &plan.new_entries)
                .await?;
        }
        self.store.mark_day_clean(user_id, date).await?;

        tracing::info!(
            user_id,
            %date,
            reason = day.dirty_reason.as_deref().unwrap_or("initial"),
            inserted = plan.new_entries.len(),
            removed = split.removable_ids.len(),
            unassigned = plan.rejected.len(),
            "Replanned day",
        );

        let entries = self.store.entries_for_day(user_id, date).await?;
        Ok(assemble_day(
            date,
            view_cutoff,
            &slots,
            &entries,
            plan.rejected,
            plan.incomplete,
        ))
    }
}
