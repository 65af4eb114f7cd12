use crate::storage::snapshot::User;
use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

/// Per-invocation table of user UTC offsets, in minutes east of UTC.
///
/// Total by construction: every user handed to [`resolve_offsets`] gets an
/// entry, and readers treat absent users as offset 0.
pub type OffsetTable = HashMap<i64, i32>;

/// Resolve each user's stored zone name to its UTC offset at `at`.
///
/// Offsets are taken at the single instant `at` (callers pass `Utc::now()`),
/// so the table reflects the daylight-saving state of that moment rather
/// than of each event's own timestamp. Zone strings are user-supplied;
/// anything chrono-tz cannot parse is recorded as offset 0 with a warning.
/// One bad zone never aborts the table build.
pub fn resolve_offsets(users: &[User], at: DateTime<Utc>) -> OffsetTable {
    let mut offsets = OffsetTable::with_capacity(users.len());
    for user in users {
        let minutes = match user.timezone.parse::<Tz>() {
            Ok(tz) => zone_offset_minutes(tz, at),
            Err(_) => {
                tracing::warn!(
                    user_id = user.id,
                    timezone = %user.timezone,
                    "Unknown timezone, defaulting to UTC"
                );
                0
            }
        };
        offsets.insert(user.id, minutes);
    }
    offsets
}

/// UTC offset of `tz` in whole minutes at the given instant.
///
/// Stays in minutes end to end, so fractional-hour zones (Asia/Kolkata
/// +05:30, Australia/Eucla +08:45) are exact.
fn zone_offset_minutes(tz: Tz, at: DateTime<Utc>) -> i32 {
    at.with_timezone(&tz).offset().fix().local_minus_utc() / 60
}
