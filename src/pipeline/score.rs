use crate::storage::snapshot::EventType;

/// Engagement weight for an event type.
///
/// Total over all inputs: unrecognized events weigh 0 but are still
/// counted toward their (artist, hour) group by the aggregator.
pub const fn score(event_type: EventType) -> i64 {
    match event_type {
        EventType::LikeTrack | EventType::AddTrackToPlaylist => 2,
        EventType::PlayTrack => 1,
        EventType::ShareTrack => 3,
        EventType::Other => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_table() {
        assert_eq!(score(EventType::LikeTrack), 2);
        assert_eq!(score(EventType::AddTrackToPlaylist), 2);
        assert_eq!(score(EventType::PlayTrack), 1);
        assert_eq!(score(EventType::ShareTrack), 3);
    }

    #[test]
    fn test_unknown_scores_zero() {
        assert_eq!(score(EventType::Other), 0);
    }
}
