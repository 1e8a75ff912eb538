//! Timetable slot rows and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

use tempo_core::error::CoreError;
use tempo_core::slots::SlotRecord;
use tempo_core::types::{DbId, Timestamp, MINUTES_PER_DAY};

/// A row from `timetable_slots`.
#[derive(Debug, Clone, FromRow)]
pub struct TimetableSlotRow {
    pub id: DbId,
    pub user_id: DbId,
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub label: Option<String>,
    pub area_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TimetableSlotRow {
    /// Attach the allowed-project set and produce the planner's view of
    /// this slot.
    pub fn into_record(self, project_ids: Vec<DbId>) -> SlotRecord {
        SlotRecord {
            id: self.id,
            user_id: self.user_id,
            weekday: self.weekday,
            start_minute: self.start_minute,
            end_minute: self.end_minute,
            label: self.label,
            area_id: self.area_id,
            project_ids,
        }
    }
}

/// DTO for creating a slot.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTimetableSlot {
    #[validate(range(min = 0, max = 6))]
    pub weekday: i32,
    #[validate(range(min = 0, max = 1440))]
    pub start_minute: i32,
    #[validate(range(min = 0, max = 1440))]
    pub end_minute: i32,
    pub label: Option<String>,
    pub area_id: Option<DbId>,
    #[serde(default)]
    pub project_ids: Vec<DbId>,
}

impl CreateTimetableSlot {
    /// Validate the payload, folding validator output into the engine
    /// error taxonomy. The minute-span invariant is cross-field, so it is
    /// checked here rather than via a field attribute.
    pub fn validate_payload(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;
        if self.end_minute <= self.start_minute {
            return Err(CoreError::Validation(
                "end_minute must be greater than start_minute".to_string(),
            ));
        }
        Ok(())
    }
}

/// DTO for patching a slot. All fields optional; `project_ids` replaces
/// the whole allowed set when present.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTimetableSlot {
    pub weekday: Option<i32>,
    pub start_minute: Option<i32>,
    pub end_minute: Option<i32>,
    pub label: Option<String>,
    pub area_id: Option<DbId>,
    pub project_ids: Option<Vec<DbId>>,
}

impl UpdateTimetableSlot {
    /// Validate the patch against the current row: the merged result must
    /// still satisfy the slot invariants.
    pub fn validate_against(&self, current: &TimetableSlotRow) -> Result<(), CoreError> {
        let weekday = self.weekday.unwrap_or(current.weekday);
        let start = self.start_minute.unwrap_or(current.start_minute);
        let end = self.end_minute.unwrap_or(current.end_minute);
        if !(0..=6).contains(&weekday) {
            return Err(CoreError::Validation(
                "weekday must be between 0 and 6".to_string(),
            ));
        }
        if start < 0 || end > MINUTES_PER_DAY || end <= start {
            return Err(CoreError::Validation(
                "end_minute must be greater than start_minute within one day".to_string(),
            ));
        }
        Ok(())
    }
}
