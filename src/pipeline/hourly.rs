use crate::pipeline::score::score;
use crate::pipeline::timezone::OffsetTable;
use crate::storage::snapshot::UserEvent;
use std::collections::BTreeMap;

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;

/// An aggregated engagement row: one artist, one local hour of day.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HourlyScoreRow {
    pub artist_id: i64,
    /// Zero-padded hour of day, "00".."23".
    pub hour: String,
    pub total_score: i64,
}

/// Hour of day (0..=23) after shifting an epoch-ms timestamp by a
/// per-user offset.
///
/// Pure arithmetic in the UTC calendar: the shift saturates instead of
/// wrapping at the extremes of i64, and euclidean division keeps
/// pre-epoch timestamps in range.
// rem_euclid(24) bounds the value; the cast cannot truncate
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn local_hour(created_at_ms: i64, offset_minutes: i32) -> u8 {
    let local_ms = created_at_ms.saturating_add(i64::from(offset_minutes) * MS_PER_MINUTE);
    local_ms.div_euclid(MS_PER_HOUR).rem_euclid(24) as u8
}

/// Fold events into summed scores grouped by (artist, local hour).
///
/// Users absent from the offset table localize with offset 0. Rows come
/// out sorted by artist_id ascending, then hour ascending — the map's key
/// order, which for the zero-padded hour strings agrees with numeric
/// order. An event scoring 0 still materializes its group.
pub fn aggregate_hourly(events: &[UserEvent], offsets: &OffsetTable) -> Vec<HourlyScoreRow> {
    let mut groups: BTreeMap<(i64, u8), i64> = BTreeMap::new();

    for event in events {
        let offset = offsets.get(&event.user_id).copied().unwrap_or(0);
        let hour = local_hour(event.created_at, offset);
        *groups.entry((event.artist_id, hour)).or_insert(0) += score(event.event_type);
    }

    groups
        .into_iter()
        .map(|((artist_id, hour), total_score)| HourlyScoreRow {
            artist_id,
            hour: format!("{hour:02}"),
            total_score,
        })
        .collect()
}
