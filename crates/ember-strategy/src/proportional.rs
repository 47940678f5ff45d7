//! Proportional strategy — keep a fixed share of each flavor's free
//! nodes warm.
//!
//! For every flavor, the strategy targets
//! `ceil(percentage_to_cache * eligible_nodes)` nodes holding a current
//! image. Nodes caching a checksum that no longer matches any image for
//! their flavor are ejected (stale cache) and become cache candidates
//! again on a later cycle, once their eviction has taken effect.
//!
//! Image assignment is round-robin over the flavor's images in input
//! order, and node selection follows inventory order, so identical
//! inputs always produce the identical directive sequence.

use std::collections::HashSet;

use tracing::debug;

use crate::directive::Directive;
use crate::inputs::{FlavorInput, ImageInput, NodeInput};
use crate::strategy::CacheStrategy;

/// Deterministic proportional cache strategy.
#[derive(Debug, Clone)]
pub struct ProportionalStrategy {
    /// Share of each flavor's eligible nodes to keep cached (0.0–1.0).
    pub percentage_to_cache: f64,
}

impl Default for ProportionalStrategy {
    fn default() -> Self {
        Self {
            percentage_to_cache: 0.5,
        }
    }
}

impl ProportionalStrategy {
    pub fn new(percentage_to_cache: f64) -> Self {
        Self {
            percentage_to_cache: percentage_to_cache.clamp(0.0, 1.0),
        }
    }

    fn directives_for_flavor(
        &self,
        flavor: &FlavorInput,
        nodes: &[NodeInput],
        images: &[ImageInput],
    ) -> Vec<Directive> {
        let flavor_images: Vec<&ImageInput> = images
            .iter()
            .filter(|i| i.flavor_affinity == flavor.name)
            .collect();

        let eligible: Vec<&NodeInput> = nodes
            .iter()
            .filter(|n| n.is_available() && (flavor.is_flavor_node)(n))
            .collect();

        if eligible.is_empty() {
            return Vec::new();
        }

        if flavor_images.is_empty() {
            // Nothing can be cached, and nothing can be judged stale
            // against an empty image set.
            debug!(flavor = %flavor.name, "no images with affinity for flavor");
            return Vec::new();
        }

        let current: HashSet<&str> = flavor_images
            .iter()
            .map(|i| i.checksum.as_str())
            .collect();

        let mut out = Vec::new();

        // Nodes holding a checksum no image carries anymore: eject, and
        // keep them out of this cycle's cache candidates.
        let mut cached: Vec<&NodeInput> = Vec::new();
        let mut uncached: Vec<&NodeInput> = Vec::new();
        for node in &eligible {
            match &node.cached_checksum {
                Some(sum) if current.contains(sum.as_str()) => cached.push(node),
                Some(_) => out.push(Directive::eject(&node.node_id)),
                None => uncached.push(node),
            }
        }

        let target = (self.percentage_to_cache * eligible.len() as f64).ceil() as usize;

        if cached.len() < target {
            let needed = target - cached.len();
            for (i, node) in uncached.iter().take(needed).enumerate() {
                let image = flavor_images[i % flavor_images.len()];
                out.push(Directive::cache(&node.node_id, &image.name, &image.checksum));
            }
        } else if cached.len() > target {
            let surplus = cached.len() - target;
            for node in cached.iter().rev().take(surplus) {
                out.push(Directive::eject(&node.node_id));
            }
        }

        debug!(
            flavor = %flavor.name,
            eligible = eligible.len(),
            cached = cached.len(),
            target,
            directives = out.len(),
            "proportional pass"
        );

        out
    }
}

impl CacheStrategy for ProportionalStrategy {
    fn directives(
        &self,
        nodes: &[NodeInput],
        flavors: &[FlavorInput],
        images: &[ImageInput],
    ) -> Vec<Directive> {
        flavors
            .iter()
            .flat_map(|flavor| self.directives_for_flavor(flavor, nodes, images))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_flavor() -> FlavorInput {
        FlavorInput::by_name("io")
    }

    fn io_images() -> Vec<ImageInput> {
        vec![
            ImageInput::new("ubuntu", "io", "sum-ubuntu"),
            ImageInput::new("coreos", "io", "sum-coreos"),
        ]
    }

    fn free_nodes(count: usize) -> Vec<NodeInput> {
        (0..count)
            .map(|i| NodeInput::new(&format!("n{i}"), "io", false, false))
            .collect()
    }

    #[test]
    fn caches_up_to_target_round_robin() {
        let strategy = ProportionalStrategy::new(0.5);
        let nodes = free_nodes(4);

        let out = strategy.directives(&nodes, &[io_flavor()], &io_images());

        // ceil(0.5 * 4) = 2 cache directives, alternating images.
        assert_eq!(
            out,
            vec![
                Directive::cache("n0", "ubuntu", "sum-ubuntu"),
                Directive::cache("n1", "coreos", "sum-coreos"),
            ]
        );
    }

    #[test]
    fn already_cached_nodes_count_toward_target() {
        let strategy = ProportionalStrategy::new(0.5);
        let mut nodes = free_nodes(4);
        nodes[2] = nodes[2].clone().with_cached_checksum("sum-ubuntu");

        let out = strategy.directives(&nodes, &[io_flavor()], &io_images());
        assert_eq!(out, vec![Directive::cache("n0", "ubuntu", "sum-ubuntu")]);
    }

    #[test]
    fn stale_checksum_is_ejected_not_recached_same_cycle() {
        let strategy = ProportionalStrategy::new(1.0);
        let nodes = vec![
            NodeInput::new("n0", "io", false, false).with_cached_checksum("sum-old"),
            NodeInput::new("n1", "io", false, false),
        ];

        let out = strategy.directives(&nodes, &[io_flavor()], &io_images());
        assert_eq!(
            out,
            vec![
                Directive::eject("n0"),
                Directive::cache("n1", "ubuntu", "sum-ubuntu"),
            ]
        );
    }

    #[test]
    fn surplus_cached_nodes_are_ejected_last_first() {
        // Target is ceil(0.25 * 4) = 1, but three nodes are cached.
        let strategy = ProportionalStrategy::new(0.25);
        let nodes = vec![
            NodeInput::new("n0", "io", false, false).with_cached_checksum("sum-ubuntu"),
            NodeInput::new("n1", "io", false, false).with_cached_checksum("sum-coreos"),
            NodeInput::new("n2", "io", false, false).with_cached_checksum("sum-ubuntu"),
            NodeInput::new("n3", "io", false, false),
        ];

        let out = strategy.directives(&nodes, &[io_flavor()], &io_images());
        assert_eq!(out, vec![Directive::eject("n2"), Directive::eject("n1")]);
    }

    #[test]
    fn excluded_nodes_are_never_targeted() {
        let strategy = ProportionalStrategy::new(1.0);
        let nodes = vec![
            NodeInput::new("n0", "io", true, false),
            NodeInput::new("n1", "io", false, true),
            NodeInput::new("n2", "io", false, false),
        ];

        let out = strategy.directives(&nodes, &[io_flavor()], &io_images());
        assert_eq!(out, vec![Directive::cache("n2", "ubuntu", "sum-ubuntu")]);
    }

    #[test]
    fn flavor_without_images_yields_nothing() {
        let strategy = ProportionalStrategy::new(1.0);
        let nodes = free_nodes(3);
        let images = vec![ImageInput::new("ubuntu", "cpu", "sum-ubuntu")];

        assert!(strategy.directives(&nodes, &[io_flavor()], &images).is_empty());
    }

    #[test]
    fn deterministic_across_invocations() {
        let strategy = ProportionalStrategy::default();
        let nodes = free_nodes(7);
        let flavors = vec![io_flavor()];
        let images = io_images();

        let first = strategy.directives(&nodes, &flavors, &images);
        let second = strategy.directives(&nodes, &flavors, &images);
        assert_eq!(first, second);
    }

    #[test]
    fn percentage_is_clamped() {
        let strategy = ProportionalStrategy::new(7.5);
        assert_eq!(strategy.percentage_to_cache, 1.0);
        let strategy = ProportionalStrategy::new(-1.0);
        assert_eq!(strategy.percentage_to_cache, 0.0);
    }
}
