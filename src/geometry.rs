use itertools::Itertools;

/// Concentric hit region of a target, from the bullseye outward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Zone {
    Miss,
    Outer,
    Middle,
    Inner,
}

impl Zone {
    /// Points awarded for a click landing in this zone.
    pub fn score(self) -> u32 {
        match self {
            Zone::Miss => 0,
            Zone::Outer => 1,
            Zone::Middle => 2,
            Zone::Inner => 5,
        }
    }

    pub fn is_hit(self) -> bool {
        self != Zone::Miss
    }
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Classify a click by its distance from the target center, against the
/// target's current rendered diameter. Inner zone ends at 25% of the radius,
/// middle at 55%, outer at the rim.
pub fn classify(dist: f64, effective_diameter: f64) -> Zone {
    let radius = effective_diameter / 2.0;
    if radius <= 0.0 {
        return Zone::Miss;
    }
    if dist <= radius * 0.25 {
        Zone::Inner
    } else if dist <= radius * 0.55 {
        Zone::Middle
    } else if dist <= radius {
        Zone::Outer
    } else {
        Zone::Miss
    }
}

/// Remaining fraction of a shrinking target's size, linear in elapsed time.
/// Safe to sample at any cadence; clamps to [0, 1].
pub fn shrink_progress(now_ms: f64, created_at_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 0.0;
    }
    (1.0 - (now_ms - created_at_ms) / duration_ms).clamp(0.0, 1.0)
}

/// Cursor path efficiency between the anchor (last hit, or session start) and
/// the most recent sample: straight-line distance over total traveled
/// distance, as a percentage. Fewer than 3 samples, or a zero-length path,
/// count as perfectly straight.
pub fn path_linearity(path: &[(f64, f64)], anchor: Option<(f64, f64)>) -> f64 {
    let (Some(anchor), Some(last)) = (anchor, path.last()) else {
        return 100.0;
    };
    if path.len() < 3 {
        return 100.0;
    }

    let straight = distance(anchor, *last);
    let total: f64 = path
        .iter()
        .tuple_windows()
        .map(|(a, b)| distance(*a, *b))
        .sum();

    if total > 0.0 {
        // The buffer drops its oldest samples once full, which can leave the
        // remaining segments shorter than the anchor-to-end line. Cap at 100.
        (straight / total * 100.0).min(100.0)
    } else {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
        assert_eq!(distance((1.0, 1.0), (1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_classify_bullseye() {
        // dead-center click on a 100px target
        assert_eq!(classify(0.0, 100.0), Zone::Inner);
        assert_eq!(Zone::Inner.score(), 5);
    }

    #[test]
    fn test_classify_zone_boundaries() {
        // radius 50: inner ends at 12.5, middle at 27.5, outer at 50
        assert_eq!(classify(12.5, 100.0), Zone::Inner);
        assert_eq!(classify(12.6, 100.0), Zone::Middle);
        assert_eq!(classify(27.5, 100.0), Zone::Middle);
        assert_eq!(classify(27.6, 100.0), Zone::Outer);
        assert_eq!(classify(50.0, 100.0), Zone::Outer);
        assert_eq!(classify(50.1, 100.0), Zone::Miss);
    }

    #[test]
    fn test_classify_rim_click() {
        // 0.55 * 50 = 27.5 < 45 <= 50
        assert_eq!(classify(45.0, 100.0), Zone::Outer);
        assert_eq!(Zone::Outer.score(), 1);
    }

    #[test]
    fn test_classify_outside_is_miss() {
        assert_eq!(classify(60.0, 100.0), Zone::Miss);
        assert_eq!(Zone::Miss.score(), 0);
        assert!(!Zone::Miss.is_hit());
    }

    #[test]
    fn test_classify_fully_shrunk_target_unhittable() {
        assert_eq!(classify(0.0, 0.0), Zone::Miss);
    }

    #[test]
    fn test_score_mapping() {
        assert_eq!(Zone::Miss.score(), 0);
        assert_eq!(Zone::Outer.score(), 1);
        assert_eq!(Zone::Middle.score(), 2);
        assert_eq!(Zone::Inner.score(), 5);
    }

    #[test]
    fn test_shrink_progress_linear() {
        assert_eq!(shrink_progress(0.0, 0.0, 1000.0), 1.0);
        assert_eq!(shrink_progress(500.0, 0.0, 1000.0), 0.5);
        assert_eq!(shrink_progress(1000.0, 0.0, 1000.0), 0.0);
    }

    #[test]
    fn test_shrink_progress_clamps() {
        assert_eq!(shrink_progress(2000.0, 0.0, 1000.0), 0.0);
        // created in the future (clock skew) still clamps to 1
        assert_eq!(shrink_progress(0.0, 100.0, 1000.0), 1.0);
    }

    #[test]
    fn test_linearity_straight_line() {
        let path = vec![(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)];
        assert_eq!(path_linearity(&path, Some((0.0, 0.0))), 100.0);
    }

    #[test]
    fn test_linearity_detour_halves() {
        // travel 100 up then 100 right: total 200, straight ~141.4
        let path = vec![(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)];
        let lin = path_linearity(&path, Some((0.0, 0.0)));
        assert!((lin - 70.71).abs() < 0.01, "got {lin}");
    }

    #[test]
    fn test_linearity_few_points_is_perfect() {
        assert_eq!(path_linearity(&[], Some((0.0, 0.0))), 100.0);
        assert_eq!(path_linearity(&[(1.0, 1.0)], Some((0.0, 0.0))), 100.0);
        assert_eq!(
            path_linearity(&[(1.0, 1.0), (2.0, 2.0)], Some((0.0, 0.0))),
            100.0
        );
    }

    #[test]
    fn test_linearity_no_anchor_is_perfect() {
        let path = vec![(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)];
        assert_eq!(path_linearity(&path, None), 100.0);
    }

    #[test]
    fn test_linearity_stationary_path() {
        let path = vec![(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)];
        assert_eq!(path_linearity(&path, Some((5.0, 5.0))), 100.0);
    }

    #[test]
    fn test_linearity_bounded() {
        // anchor far from a short surviving path segment; must not exceed 100
        let path = vec![(90.0, 0.0), (95.0, 0.0), (100.0, 0.0)];
        let lin = path_linearity(&path, Some((0.0, 0.0)));
        assert_eq!(lin, 100.0);
    }
}
