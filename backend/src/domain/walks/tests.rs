//! Regression coverage for walk domain types.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::User;

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn draft() -> WalkDraft {
    let host = User::try_from_strings(
        "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "Ada Lovelace",
        "ada@example.org",
    )
    .expect("valid host")
    .walker();
    let starts_at = noon() + Duration::hours(1);
    WalkDraft {
        id: WalkId::from_uuid(Uuid::nil()),
        title: "  Riverside loop ".to_owned(),
        host,
        starts_at,
        ends_at: starts_at + Duration::minutes(45),
        pace: Pace::Medium,
        terrain: Terrain::Mixed,
        conversation_mode: ConversationMode::Light,
        dog_policy: DogPolicy::Indifferent,
        non_smokers_only: false,
        capacity: 3,
        area_label: "Old bridge".to_owned(),
        created_at: noon(),
    }
}

#[rstest]
fn valid_draft_becomes_scheduled_walk(draft: WalkDraft) {
    let walk = Walk::schedule(draft, noon()).expect("valid walk");
    assert_eq!(walk.status(), WalkStatus::Scheduled);
    assert_eq!(walk.title(), "Riverside loop");
    assert_eq!(walk.capacity(), 3);
    assert!(walk.is_joinable());
}

#[rstest]
fn blank_text_fields_take_defaults(mut draft: WalkDraft) {
    draft.title = "   ".to_owned();
    draft.area_label = String::new();
    let walk = Walk::new(draft).expect("valid walk");
    assert_eq!(walk.title(), DEFAULT_TITLE);
    assert_eq!(walk.area_label(), DEFAULT_AREA_LABEL);
}

#[rstest]
fn start_must_precede_end(mut draft: WalkDraft) {
    draft.ends_at = draft.starts_at;
    assert_eq!(Walk::new(draft), Err(WalkValidationError::EndsBeforeStart));
}

#[rstest]
#[case(Duration::zero())]
#[case(Duration::minutes(5))]
fn schedule_rejects_past_or_present_start(mut draft: WalkDraft, #[case] late_by: Duration) {
    let now = draft.starts_at + late_by;
    draft.ends_at = now + Duration::hours(1);
    assert_eq!(
        Walk::schedule(draft, now),
        Err(WalkValidationError::StartsInPast)
    );
}

#[rstest]
fn restore_skips_clock_and_keeps_status(draft: WalkDraft) {
    let walk = Walk::restore(draft, WalkStatus::Done).expect("stored walk");
    assert_eq!(walk.status(), WalkStatus::Done);
    assert!(!walk.is_joinable());
}

#[rstest]
fn zero_capacity_is_rejected(mut draft: WalkDraft) {
    draft.capacity = 0;
    assert_eq!(Walk::new(draft), Err(WalkValidationError::ZeroCapacity));
}

#[rstest]
fn overlong_title_is_rejected(mut draft: WalkDraft) {
    draft.title = "x".repeat(TEXT_FIELD_MAX + 1);
    assert_eq!(
        Walk::new(draft),
        Err(WalkValidationError::TitleTooLong { max: TEXT_FIELD_MAX })
    );
}

#[rstest]
fn overlong_area_label_is_rejected(mut draft: WalkDraft) {
    draft.area_label = "y".repeat(TEXT_FIELD_MAX + 1);
    assert_eq!(
        Walk::new(draft),
        Err(WalkValidationError::AreaLabelTooLong { max: TEXT_FIELD_MAX })
    );
}

#[rstest]
fn public_view_hides_host_and_preferences(draft: WalkDraft) {
    let walk = Walk::new(draft).expect("valid walk");
    let value = serde_json::to_value(walk.public_view()).expect("serialise projection");
    assert_eq!(
        value,
        json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "title": "Riverside loop",
            "startTime": "2026-05-01T13:00:00Z",
            "endTime": "2026-05-01T13:45:00Z",
            "areaLabel": "Old bridge",
            "capacity": 3,
        })
    );
}

#[rstest]
#[case(ParticipantCounts::new(2, 3), false, 1)]
#[case(ParticipantCounts::new(3, 3), true, 0)]
#[case(ParticipantCounts::new(4, 3), true, 0)]
fn counts_report_fullness(
    #[case] counts: ParticipantCounts,
    #[case] full: bool,
    #[case] remaining: u32,
) {
    assert_eq!(counts.is_full(), full);
    assert_eq!(counts.remaining(), remaining);
}

#[rstest]
fn counts_serialise_as_now_and_max() {
    let value = serde_json::to_value(ParticipantCounts::new(1, 3)).expect("serialise counts");
    assert_eq!(value, json!({ "now": 1, "max": 3 }));
}
