use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::SlotParseError;
use crate::models::slot::{RawSlot, TimeWindow};

// Rendered as e.g. "06月03日14时"
const SLOT_LABEL_FORMAT: &str = "%m月%d日%H时";

// Check whether a time of day falls inside the configured window
pub fn slot_in_window(time: NaiveTime, window: &TimeWindow) -> bool {
    window.contains(time)
}

// Parse the "HH:MM" start time of a slot record
pub fn parse_start_time(slot: &RawSlot) -> Result<NaiveTime, SlotParseError> {
    NaiveTime::parse_from_str(&slot.start_time, "%H:%M").map_err(|source| SlotParseError {
        field: "start_time",
        value: slot.start_time.clone(),
        source,
    })
}

/// Render one slot as `<month>月<day>日<hour>时<label>`
pub fn render_slot(slot: &RawSlot, label: &str) -> Result<String, SlotParseError> {
    let joined = format!("{} {}", slot.date, slot.start_time);
    let starts_at =
        NaiveDateTime::parse_from_str(&joined, "%Y-%m-%d %H:%M").map_err(|source| {
            SlotParseError {
                field: "date",
                value: slot.date.clone(),
                source,
            }
        })?;

    Ok(format!("{}{}", starts_at.format(SLOT_LABEL_FORMAT), label))
}

/// Keep the available slots that start inside `window` and render them for one court.
///
/// Records that are not `Available` are dropped before their fields are parsed.
/// A malformed date or time on an available record aborts the whole call.
pub fn format_available_slots(
    slots: &[RawSlot],
    label: &str,
    window: &TimeWindow,
) -> Result<Vec<String>, SlotParseError> {
    let mut rendered = Vec::new();

    for slot in slots {
        if !slot.is_available() {
            continue;
        }

        let start_time = parse_start_time(slot)?;
        if !slot_in_window(start_time, window) {
            debug!(
                "Skipping {} {} at {}: outside {}-{}",
                slot.date,
                slot.start_time,
                label,
                window.start(),
                window.end()
            );
            continue;
        }

        rendered.push(render_slot(slot, label)?);
    }

    Ok(rendered)
}
