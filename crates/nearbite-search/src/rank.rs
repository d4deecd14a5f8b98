//! Deduplication, distance ranking, and the sanity bound applied to raw
//! provider results.

use std::collections::HashSet;

use nearbite_core::{distance_meters, Candidate, Coordinate};

/// Collapse near-duplicates by [`Candidate::dedup_key`].
///
/// The first occurrence of each key wins and the relative order of survivors
/// is preserved.
#[must_use]
pub fn dedup_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
    candidates.retain(|candidate| seen.insert(candidate.dedup_key()));
    candidates
}

/// Sort by ascending distance from `origin`. Stable: equidistant candidates
/// keep their prior relative order.
#[must_use]
pub fn rank_by_distance(origin: Coordinate, candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut keyed: Vec<(f64, Candidate)> = candidates
        .into_iter()
        .map(|c| (distance_meters(origin, c.coordinate), c))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Drop candidates farther than `max_distance_m` from `origin`.
#[must_use]
pub fn within_distance(
    origin: Coordinate,
    mut candidates: Vec<Candidate>,
    max_distance_m: f64,
) -> Vec<Candidate> {
    candidates.retain(|c| distance_meters(origin, c.coordinate) <= max_distance_m);
    candidates
}

/// Dedup, rank, then bound, in that order.
pub(crate) fn prepare_results(
    origin: Coordinate,
    raw: Vec<Candidate>,
    max_distance_m: f64,
) -> Vec<Candidate> {
    let raw_count = raw.len();
    let deduped = dedup_candidates(raw);
    let deduped_count = deduped.len();
    let ranked = rank_by_distance(origin, deduped);
    let bounded = within_distance(origin, ranked, max_distance_m);

    tracing::debug!(
        %origin,
        raw = raw_count,
        duplicates = raw_count - deduped_count,
        out_of_bounds = deduped_count - bounded.len(),
        kept = bounded.len(),
        "prepared search results"
    );
    bounded
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Coordinate = Coordinate::new(37.7749, -122.4194);

    fn at(id: &str, name: &str, lat: f64, lng: f64) -> Candidate {
        Candidate::new(id, name, Coordinate::new(lat, lng))
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let input = vec![
            at("a", "Joe's", 37.780_1, -122.410_1),
            at("b", "Sushi Ran", 37.79, -122.42),
            at("c", "JOE'S", 37.780_4, -122.409_8),
            at("d", "Sushi Ran", 37.79, -122.42),
        ];
        let out = dedup_candidates(input);
        assert_eq!(ids(&out), vec!["a", "b"]);
    }

    #[test]
    fn dedup_keeps_same_name_in_different_cells() {
        let input = vec![
            at("a", "Starbucks", 37.78, -122.41),
            at("b", "Starbucks", 37.79, -122.41),
        ];
        assert_eq!(dedup_candidates(input).len(), 2);
    }

    #[test]
    fn dedup_is_idempotent() {
        let input = vec![
            at("a", "X", 1.0, 1.0),
            at("b", "x", 1.0, 1.0),
            at("c", "Y", 2.0, 2.0),
        ];
        let once = dedup_candidates(input);
        let twice = dedup_candidates(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn rank_orders_by_ascending_distance() {
        let input = vec![
            at("far", "Far", 37.80, -122.4194),
            at("near", "Near", 37.7759, -122.4194),
            at("mid", "Mid", 37.79, -122.4194),
        ];
        let ranked = rank_by_distance(ORIGIN, input);
        assert_eq!(ids(&ranked), vec!["near", "mid", "far"]);
        for pair in ranked.windows(2) {
            assert!(
                distance_meters(ORIGIN, pair[0].coordinate)
                    <= distance_meters(ORIGIN, pair[1].coordinate)
            );
        }
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let input = vec![
            at("first", "A", 37.78, -122.4194),
            at("second", "B", 37.78, -122.4194),
        ];
        let ranked = rank_by_distance(ORIGIN, input);
        assert_eq!(ids(&ranked), vec!["first", "second"]);
    }

    #[test]
    fn within_distance_drops_far_candidates() {
        let input = vec![
            at("in", "In", 37.78, -122.4194),
            // ~27 km north
            at("out", "Out", 38.02, -122.4194),
        ];
        let kept = within_distance(ORIGIN, input, 15_000.0);
        assert_eq!(ids(&kept), vec!["in"]);
    }

    #[test]
    fn prepare_results_applies_all_steps() {
        let input = vec![
            at("dup-2", "Cafe", 37.79, -122.4194),
            at("near", "Deli", 37.776, -122.4194),
            at("dup-3", "cafe", 37.79, -122.4194),
            at("far", "Far", 38.5, -122.4194),
        ];
        let out = prepare_results(ORIGIN, input, 15_000.0);
        assert_eq!(ids(&out), vec!["near", "dup-2"]);
    }
}
