//! Per-cycle directive rate limiting.
//!
//! A `RateLimiter` caps how many directives of one kind survive a cycle.
//! It is pure and holds no state between calls: each cycle's cap is
//! evaluated fresh against that cycle's directive list, so no unspent
//! capacity carries over as debt when the fleet is bursty.

use ember_strategy::{Directive, DirectiveKind};

/// First-N truncation of one directive kind.
///
/// Directives of other kinds pass through untouched, and relative order
/// is preserved throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    cap: usize,
}

impl RateLimiter {
    /// Build a limiter from a configured cap. A cap of zero means
    /// "unlimited" and yields no limiter at all, so callers skip the
    /// throttle step entirely.
    pub fn from_cap(cap: usize) -> Option<Self> {
        if cap == 0 { None } else { Some(Self { cap }) }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Keep at most `cap` directives of `kind`, dropping the remainder
    /// in original order.
    pub fn apply(&self, directives: Vec<Directive>, kind: DirectiveKind) -> Vec<Directive> {
        let mut kept = 0;
        directives
            .into_iter()
            .filter(|directive| {
                if directive.kind() != kind {
                    return true;
                }
                if kept < self.cap {
                    kept += 1;
                    true
                } else {
                    false
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_directives() -> Vec<Directive> {
        vec![
            Directive::cache("node-a", "image-a", "checksum-a"),
            Directive::cache("node-b", "image-b", "checksum-b"),
            Directive::cache("node-c", "image-c", "checksum-c"),
            Directive::eject("node-f"),
            Directive::eject("node-g"),
        ]
    }

    #[test]
    fn zero_cap_yields_no_limiter() {
        assert!(RateLimiter::from_cap(0).is_none());
        assert!(RateLimiter::from_cap(1).is_some());
    }

    #[test]
    fn keeps_first_n_of_governed_kind() {
        let limiter = RateLimiter::from_cap(2).unwrap();
        let out = limiter.apply(mixed_directives(), DirectiveKind::Cache);

        assert_eq!(
            out,
            vec![
                Directive::cache("node-a", "image-a", "checksum-a"),
                Directive::cache("node-b", "image-b", "checksum-b"),
                Directive::eject("node-f"),
                Directive::eject("node-g"),
            ]
        );
    }

    #[test]
    fn other_kinds_pass_through_unchanged() {
        let limiter = RateLimiter::from_cap(1).unwrap();
        let out = limiter.apply(mixed_directives(), DirectiveKind::Eject);

        let caches = out.iter().filter(|d| d.kind() == DirectiveKind::Cache).count();
        let ejects = out.iter().filter(|d| d.kind() == DirectiveKind::Eject).count();
        assert_eq!(caches, 3);
        assert_eq!(ejects, 1);
    }

    #[test]
    fn cap_above_count_keeps_everything() {
        let limiter = RateLimiter::from_cap(10).unwrap();
        let input = mixed_directives();
        assert_eq!(limiter.apply(input.clone(), DirectiveKind::Cache), input);
    }

    #[test]
    fn applying_twice_gives_independent_counts() {
        let cache_limiter = RateLimiter::from_cap(2).unwrap();
        let eject_limiter = RateLimiter::from_cap(1).unwrap();

        let out = cache_limiter.apply(mixed_directives(), DirectiveKind::Cache);
        let out = eject_limiter.apply(out, DirectiveKind::Eject);

        let caches = out.iter().filter(|d| d.kind() == DirectiveKind::Cache).count();
        let ejects = out.iter().filter(|d| d.kind() == DirectiveKind::Eject).count();
        assert_eq!(caches, 2);
        assert_eq!(ejects, 1);
    }

    #[test]
    fn no_retained_state_between_calls() {
        let limiter = RateLimiter::from_cap(2).unwrap();
        // Two consecutive cycles each get a fresh budget of 2.
        for _ in 0..2 {
            let out = limiter.apply(mixed_directives(), DirectiveKind::Cache);
            let caches = out.iter().filter(|d| d.kind() == DirectiveKind::Cache).count();
            assert_eq!(caches, 2);
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        let limiter = RateLimiter::from_cap(3).unwrap();
        assert!(limiter.apply(Vec::new(), DirectiveKind::Cache).is_empty());
    }
}
