use crate::models::{ModeSegment, TransportModeSegment};

/// Splits `total_distance_meters` across segments by their share of the summed
/// duration. There is no per-segment distance signal, only time, so a segment
/// spent stuck in traffic gets as much distance as one spent moving.
pub fn allocate_by_duration(
    segments: &[ModeSegment],
    total_distance_meters: f64,
) -> Vec<TransportModeSegment> {
    if segments.is_empty() {
        return Vec::new();
    }

    let total_ms = segments
        .iter()
        .map(ModeSegment::duration_ms)
        .sum::<i64>()
        .max(1);
    let total_km = total_distance_meters / 1000.0;

    segments
        .iter()
        .map(|segment| {
            let segment_ms = segment.duration_ms().max(0);
            let ratio = segment_ms as f64 / total_ms as f64;
            TransportModeSegment {
                mode: segment.mode,
                sub_distance: total_km * ratio,
                sub_duration: segment_ms / 1000,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportMode;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    fn segment(mode: TransportMode, start: i64, end: i64) -> ModeSegment {
        ModeSegment {
            mode,
            start_time: at(start),
            end_time: at(end),
        }
    }

    #[test]
    fn empty_segments_allocate_nothing() {
        assert!(allocate_by_duration(&[], 1000.0).is_empty());
    }

    #[test]
    fn single_segment_gets_everything() {
        let result = allocate_by_duration(&[segment(TransportMode::Walking, 0, 600)], 1000.0);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].sub_distance, 1.0);
        assert_eq!(result[0].sub_duration, 600);
    }

    #[test]
    fn walk_bus_walk_is_split_by_duration_share() {
        let segments = [
            segment(TransportMode::Walking, 0, 60),
            segment(TransportMode::Bus, 60, 660),
            segment(TransportMode::Walking, 660, 700),
        ];
        let result = allocate_by_duration(&segments, 5000.0);

        // 60 : 600 : 40 of 700 seconds
        assert_relative_eq!(result[0].sub_distance, 5.0 * 60.0 / 700.0, epsilon = 1e-9);
        assert_relative_eq!(result[1].sub_distance, 5.0 * 600.0 / 700.0, epsilon = 1e-9);
        assert_relative_eq!(result[2].sub_distance, 5.0 * 40.0 / 700.0, epsilon = 1e-9);

        let total: f64 = result.iter().map(|s| s.sub_distance).sum();
        assert_relative_eq!(total, 5.0, epsilon = 1e-9);

        assert_eq!(
            result.iter().map(|s| s.sub_duration).collect::<Vec<_>>(),
            vec![60, 600, 40]
        );
        assert_eq!(result[1].mode, TransportMode::Bus);
    }

    #[test]
    fn zero_length_segments_do_not_divide_by_zero() {
        let segments = [
            segment(TransportMode::Bus, 10, 10),
            segment(TransportMode::Subway, 10, 10),
        ];
        let result = allocate_by_duration(&segments, 2000.0);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|s| s.sub_distance == 0.0 && s.sub_duration == 0));
    }
}
