//! Walk validation and conversion helpers.

use super::{Walk, WalkDraft, WalkStatus, WalkValidationError};

/// Title used when the host leaves it blank.
pub const DEFAULT_TITLE: &str = "Walk";
/// Meeting area used when the host leaves it blank.
pub const DEFAULT_AREA_LABEL: &str = "public place";
/// Maximum length of the title and the area label, in characters.
pub const TEXT_FIELD_MAX: usize = 120;

impl TryFrom<WalkDraft> for Walk {
    type Error = WalkValidationError;

    fn try_from(value: WalkDraft) -> Result<Self, Self::Error> {
        if value.starts_at >= value.ends_at {
            return Err(WalkValidationError::EndsBeforeStart);
        }
        if value.capacity == 0 {
            return Err(WalkValidationError::ZeroCapacity);
        }

        let title = normalise_text(value.title, DEFAULT_TITLE)
            .ok_or(WalkValidationError::TitleTooLong { max: TEXT_FIELD_MAX })?;
        let area_label = normalise_text(value.area_label, DEFAULT_AREA_LABEL).ok_or(
            WalkValidationError::AreaLabelTooLong { max: TEXT_FIELD_MAX },
        )?;

        Ok(Self {
            id: value.id,
            title,
            host: value.host,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            pace: value.pace,
            terrain: value.terrain,
            conversation_mode: value.conversation_mode,
            dog_policy: value.dog_policy,
            non_smokers_only: value.non_smokers_only,
            capacity: value.capacity,
            area_label,
            status: WalkStatus::INITIAL,
            created_at: value.created_at,
        })
    }
}

/// Trim `raw`, substituting `fallback` when blank. `None` when too long.
fn normalise_text(raw: String, fallback: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(fallback.to_owned());
    }
    (trimmed.chars().count() <= TEXT_FIELD_MAX).then(|| trimmed.to_owned())
}
