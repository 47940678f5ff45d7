//! The `CacheStrategy` capability — pluggable decision logic.

use std::collections::HashMap;

use tracing::info;

use crate::directive::Directive;
use crate::inputs::{FlavorInput, ImageInput, NodeInput};

/// The pluggable decision algorithm mapping current fleet state to an
/// ordered directive list.
///
/// `directives` must be pure and deterministic: identical inputs yield
/// the same sequence, in the same order. Order reflects strategy
/// priority — the director preserves it through rate limiting and into
/// dispatch.
pub trait CacheStrategy: Send + Sync {
    /// Decide which cache/eject directives to issue this cycle.
    fn directives(
        &self,
        nodes: &[NodeInput],
        flavors: &[FlavorInput],
        images: &[ImageInput],
    ) -> Vec<Directive>;

    /// Side-effecting hook that logs aggregate fleet statistics. Never
    /// affects the directive sequence.
    fn log_overall_node_statistics(
        &self,
        nodes: &[NodeInput],
        flavors: &[FlavorInput],
        images: &[ImageInput],
    ) {
        let available = nodes.iter().filter(|n| n.is_available()).count();
        let cached = nodes
            .iter()
            .filter(|n| n.cached_checksum.is_some())
            .count();

        let mut per_flavor: HashMap<&str, usize> = HashMap::new();
        for flavor in flavors {
            let count = nodes
                .iter()
                .filter(|n| (flavor.is_flavor_node)(n))
                .count();
            per_flavor.insert(flavor.name.as_str(), count);
        }

        info!(
            nodes = nodes.len(),
            available,
            cached,
            flavors = flavors.len(),
            images = images.len(),
            per_flavor = ?per_flavor,
            "overall node statistics"
        );
    }
}
