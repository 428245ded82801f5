//! Minimum duration and forbidden duration intervals of one degree of freedom.

use heapless::Vec;
use serde::Serialize;

use super::Profile;

/// Maximum number of distinct minimum-time candidate profiles.
///
/// A 7-phase profile family admits at most six distinct valid solutions for
/// one pair of boundary states, two per blocked interval plus the minimum and
/// one spare for a degenerate (touching) solution.
pub const MAX_CANDIDATES: usize = 6;

/// Maximum number of disjoint blocked intervals.
pub const MAX_INTERVALS: usize = 2;

/// Half-open range `[left, right)` of durations that admit no profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    /// Start of the range (blocked).
    pub left: f64,
    /// End of the range (reachable again).
    pub right: f64,
    /// Profile reaching the target at exactly `right`.
    pub profile: Profile,
}

impl Interval {
    /// Build an interval from the profiles at its two edges.
    ///
    /// The profile at the later edge is stored whichever of the two is passed first.
    pub fn new(left: &Profile, right: &Profile) -> Self {
        let (l, r) = (left.duration(), right.duration());
        if l <= r {
            Interval {
                left: l,
                right: r,
                profile: *right,
            }
        } else {
            Interval {
                left: r,
                right: l,
                profile: *left,
            }
        }
    }

    /// Whether `t` lies strictly inside the interval.
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        self.left < t && t < self.right
    }
}

/// Result of a minimum-time computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Shortest achievable duration, brake included.
    pub t_min: f64,
    /// Profile achieving `t_min`.
    pub p_min: Profile,
    intervals: Vec<Interval, MAX_INTERVALS>,
}

impl Default for Block {
    fn default() -> Self {
        Block::new(Profile::default())
    }
}

impl Block {
    /// Block with a single reachable profile and no forbidden intervals.
    pub fn new(p_min: Profile) -> Self {
        Block {
            t_min: p_min.duration(),
            p_min,
            intervals: Vec::new(),
        }
    }

    /// Build the block from the valid candidate profiles.
    ///
    /// Candidates are sorted by duration; the shortest becomes `p_min`. The
    /// remaining ones are paired into intervals: an odd remainder opens the
    /// first interval at `t_min`, an even one pairs consecutive candidates.
    /// Returns `None` when there is no candidate.
    pub fn from_candidates(candidates: &[Profile]) -> Option<Self> {
        let mut sorted: Vec<Profile, MAX_CANDIDATES> = Vec::new();
        for profile in candidates.iter().take(MAX_CANDIDATES) {
            // Capacity matches the `take` above.
            let _ = sorted.push(*profile);
        }
        sorted.sort_unstable_by(|a, b| a.duration().total_cmp(&b.duration()));

        let (first, rest) = sorted.split_first()?;
        let mut block = Block::new(*first);

        let rest: &[Profile] = if rest.len() % 2 == 1 {
            block.push_interval(Interval::new(first, &rest[0]));
            &rest[1..]
        } else {
            rest
        };

        for pair in rest.chunks_exact(2) {
            block.push_interval(Interval::new(&pair[0], &pair[1]));
        }

        #[cfg(feature = "defmt")]
        for interval in block.intervals() {
            defmt::debug!("blocked interval [{}, {})", interval.left, interval.right);
        }

        Some(block)
    }

    fn push_interval(&mut self, interval: Interval) {
        if interval.right > interval.left {
            // A third interval is geometrically impossible; drop it.
            let _ = self.intervals.push(interval);
        }
    }

    /// First blocked interval, if any.
    #[inline]
    pub fn a(&self) -> Option<&Interval> {
        self.intervals.first()
    }

    /// Second blocked interval, if any.
    #[inline]
    pub fn b(&self) -> Option<&Interval> {
        self.intervals.get(1)
    }

    /// All blocked intervals in ascending order.
    pub fn intervals(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    /// Whether no profile exists with total duration `t`.
    pub fn is_blocked(&self, t: f64) -> bool {
        t < self.t_min || self.intervals.iter().any(|i| i.contains(t))
    }

    /// Smallest duration `>= t` that is not blocked.
    pub fn earliest_from(&self, t: f64) -> f64 {
        let mut t = t.max(self.t_min);
        for interval in &self.intervals {
            if interval.contains(t) {
                t = interval.right;
            }
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{State, Teeth};

    fn profile_with_duration(t: f64) -> Profile {
        Profile::from_phases(
            State::default(),
            [0.0, 0.0, 0.0, t, 0.0, 0.0, 0.0],
            Teeth::Uddu.pattern(),
        )
    }

    #[test]
    fn test_single_candidate() {
        let block = Block::from_candidates(&[profile_with_duration(2.0)]).unwrap();
        assert_eq!(block.t_min, 2.0);
        assert!(block.a().is_none());
        assert!(block.is_blocked(1.5));
        assert!(!block.is_blocked(2.0));
        assert!(!block.is_blocked(7.0));
    }

    #[test]
    fn test_no_candidate() {
        assert!(Block::from_candidates(&[]).is_none());
    }

    #[test]
    fn test_three_candidates_pair_the_later_two() {
        let candidates = [
            profile_with_duration(5.0),
            profile_with_duration(2.0),
            profile_with_duration(3.0),
        ];
        let block = Block::from_candidates(&candidates).unwrap();

        assert_eq!(block.t_min, 2.0);
        let a = block.a().unwrap();
        assert_eq!((a.left, a.right), (3.0, 5.0));
        assert_eq!(a.profile.duration(), 5.0);
        assert!(block.b().is_none());

        assert!(!block.is_blocked(2.5));
        assert!(!block.is_blocked(3.0));
        assert!(block.is_blocked(4.0));
        assert!(!block.is_blocked(5.0));
        assert_eq!(block.earliest_from(4.0), 5.0);
        assert_eq!(block.earliest_from(1.0), 2.0);
    }

    #[test]
    fn test_two_candidates_open_at_t_min() {
        let candidates = [profile_with_duration(4.0), profile_with_duration(1.0)];
        let block = Block::from_candidates(&candidates).unwrap();
        let a = block.a().unwrap();
        assert_eq!((a.left, a.right), (1.0, 4.0));
        assert!(block.is_blocked(2.0));
    }

    #[test]
    fn test_five_candidates_give_two_intervals() {
        let candidates = [1.0, 2.0, 3.0, 4.0, 5.0].map(profile_with_duration);
        let block = Block::from_candidates(&candidates).unwrap();

        assert_eq!(block.intervals().count(), 2);
        let b = block.b().unwrap();
        assert_eq!((b.left, b.right), (4.0, 5.0));
        assert!(block.is_blocked(2.5));
        assert!(!block.is_blocked(3.5));
        assert!(block.is_blocked(4.5));
        assert_eq!(block.earliest_from(2.5), 3.0);
    }

    #[test]
    fn test_interval_keeps_later_profile() {
        let early = profile_with_duration(1.0);
        let late = profile_with_duration(2.0);
        assert_eq!(Interval::new(&late, &early).profile, late);
        assert_eq!(Interval::new(&early, &late).left, 1.0);
    }
}
