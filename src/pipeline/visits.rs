use crate::storage::snapshot::{Artist, Visit};
use std::collections::{HashMap, HashSet};

/// Per-artist visit totals.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VisitSummaryRow {
    pub artist_id: i64,
    pub artist_name: String,
    /// Summed visit duration in milliseconds.
    pub total_visit_duration: i64,
    pub unique_session_count: u64,
}

struct Group<'a> {
    artist_id: i64,
    artist_name: &'a str,
    duration: i64,
    sessions: HashSet<&'a str>,
}

/// Join visits to the artist catalog and total them per artist.
///
/// Inner-join semantics: a visit whose artist_id has no catalog entry is
/// excluded entirely. A row with end_time earlier than start_time
/// contributes zero duration (its session still counts toward the
/// distinct total). Output is sorted by total duration descending; equal
/// totals keep group-discovery order (stable sort).
pub fn summarize_visits(visits: &[Visit], artists: &[Artist]) -> Vec<VisitSummaryRow> {
    let names: HashMap<i64, &str> = artists.iter().map(|a| (a.id, a.name.as_str())).collect();

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for visit in visits {
        let Some(&artist_name) = names.get(&visit.artist_id) else {
            continue;
        };

        let duration = visit.end_time.saturating_sub(visit.start_time);
        let duration = if duration < 0 {
            tracing::warn!(
                artist_id = visit.artist_id,
                session_id = %visit.session_id,
                "Visit ends before it starts, clamping duration to zero"
            );
            0
        } else {
            duration
        };

        let slot = *index.entry(visit.artist_id).or_insert_with(|| {
            groups.push(Group {
                artist_id: visit.artist_id,
                artist_name,
                duration: 0,
                sessions: HashSet::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.duration = group.duration.saturating_add(duration);
        group.sessions.insert(visit.session_id.as_str());
    }

    let mut rows: Vec<VisitSummaryRow> = groups
        .into_iter()
        .map(|group| VisitSummaryRow {
            artist_id: group.artist_id,
            artist_name: group.artist_name.to_string(),
            total_visit_duration: group.duration,
            unique_session_count: u64::try_from(group.sessions.len()).unwrap_or(u64::MAX),
        })
        .collect();

    rows.sort_by(|a, b| b.total_visit_duration.cmp(&a.total_visit_duration));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: i64, name: &str) -> Artist {
        Artist {
            id,
            name: name.to_string(),
        }
    }

    fn visit(artist_id: i64, session_id: &str, start_time: i64, end_time: i64) -> Visit {
        Visit {
            artist_id,
            session_id: session_id.to_string(),
            start_time,
            end_time,
        }
    }

    #[test]
    fn test_duration_and_session_totals() {
        let artists = vec![artist(1, "Nova Tide")];
        let visits = vec![
            visit(1, "s1", 1000, 4000),
            visit(1, "s1", 5000, 6000),
            visit(1, "s2", 0, 1000),
        ];

        let rows = summarize_visits(&visits, &artists);
        assert_eq!(
            rows,
            vec![VisitSummaryRow {
                artist_id: 1,
                artist_name: "Nova Tide".to_string(),
                total_visit_duration: 4000,
                unique_session_count: 2,
            }]
        );
    }

    #[test]
    fn test_unknown_artist_excluded() {
        let artists = vec![artist(1, "Nova Tide")];
        let visits = vec![visit(1, "s1", 0, 100), visit(99, "s2", 0, 100_000)];

        let rows = summarize_visits(&visits, &artists);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].artist_id, 1);
    }

    #[test]
    fn test_artist_without_visits_not_emitted() {
        let artists = vec![artist(1, "Nova Tide"), artist(2, "Glasshouse")];
        let visits = vec![visit(1, "s1", 0, 100)];

        let rows = summarize_visits(&visits, &artists);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_sorted_by_duration_descending() {
        let artists = vec![artist(1, "A"), artist(2, "B"), artist(3, "C")];
        let visits = vec![
            visit(1, "s1", 0, 100),
            visit(2, "s2", 0, 5000),
            visit(3, "s3", 0, 700),
        ];

        let rows = summarize_visits(&visits, &artists);
        let ids: Vec<_> = rows.iter().map(|r| r.artist_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let artists = vec![artist(1, "A"), artist(2, "B")];
        let visits = vec![visit(2, "s1", 0, 100), visit(1, "s2", 0, 100)];

        let rows = summarize_visits(&visits, &artists);
        let ids: Vec<_> = rows.iter().map(|r| r.artist_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_negative_duration_clamped() {
        let artists = vec![artist(1, "A")];
        let visits = vec![visit(1, "s1", 5000, 1000), visit(1, "s2", 0, 300)];

        let rows = summarize_visits(&visits, &artists);
        assert_eq!(rows[0].total_visit_duration, 300);
        assert_eq!(rows[0].unique_session_count, 2);
    }

    #[test]
    fn test_same_session_across_artists_counted_per_artist() {
        let artists = vec![artist(1, "A"), artist(2, "B")];
        let visits = vec![visit(1, "shared", 0, 100), visit(2, "shared", 0, 50)];

        let rows = summarize_visits(&visits, &artists);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.unique_session_count == 1));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(summarize_visits(&[], &[artist(1, "A")]).is_empty());
        assert!(summarize_visits(&[visit(1, "s", 0, 1)], &[]).is_empty());
    }
}
