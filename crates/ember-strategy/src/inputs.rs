//! Per-cycle input records.
//!
//! These types represent the snapshot of fleet state a strategy decides
//! against. All three are produced once per cycle and discarded after
//! dispatch; nothing here is persisted.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Unique identifier for a provisionable node.
pub type NodeId = String;

/// Predicate capability testing whether a node belongs to a flavor.
pub type FlavorPredicate = Arc<dyn Fn(&NodeInput) -> bool + Send + Sync>;

/// A single provisionable node as reported by the scout.
///
/// `provisioned` and `maintenance` are independent exclusion flags: a
/// node carrying either is never targeted by cache/eject decisions this
/// cycle. `cached_checksum` is the checksum of whatever image the node
/// currently holds — the checksum, not the image name, is the authority
/// for "is this image actually cached".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeInput {
    pub node_id: NodeId,
    /// Name of the flavor this node is associated with.
    pub flavor: String,
    /// The node is already provisioned (managed elsewhere).
    pub provisioned: bool,
    /// The node is in maintenance and ineligible for action this cycle.
    pub maintenance: bool,
    /// Checksum of the currently cached image, if any.
    pub cached_checksum: Option<String>,
}

impl NodeInput {
    pub fn new(node_id: &str, flavor: &str, provisioned: bool, maintenance: bool) -> Self {
        Self {
            node_id: node_id.to_string(),
            flavor: flavor.to_string(),
            provisioned,
            maintenance,
            cached_checksum: None,
        }
    }

    /// Builder-style setter for the cached image checksum.
    pub fn with_cached_checksum(mut self, checksum: &str) -> Self {
        self.cached_checksum = Some(checksum.to_string());
        self
    }

    /// A node is available for caching decisions when neither exclusion
    /// flag is set.
    pub fn is_available(&self) -> bool {
        !self.provisioned && !self.maintenance
    }
}

/// A flavor definition: a name plus a membership predicate over nodes.
#[derive(Clone)]
pub struct FlavorInput {
    pub name: String,
    pub is_flavor_node: FlavorPredicate,
}

impl FlavorInput {
    pub fn new(name: &str, is_flavor_node: FlavorPredicate) -> Self {
        Self {
            name: name.to_string(),
            is_flavor_node,
        }
    }

    /// Flavor whose predicate matches on the node's flavor name.
    pub fn by_name(name: &str) -> Self {
        let flavor = name.to_string();
        Self {
            name: name.to_string(),
            is_flavor_node: Arc::new(move |node| node.flavor == flavor),
        }
    }
}

impl fmt::Debug for FlavorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlavorInput")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A bootable image definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageInput {
    pub name: String,
    /// Key tying this image to a flavor (images are cached only onto
    /// nodes of their affine flavor).
    pub flavor_affinity: String,
    /// Content checksum of the image.
    pub checksum: String,
}

impl ImageInput {
    pub fn new(name: &str, flavor_affinity: &str, checksum: &str) -> Self {
        Self {
            name: name.to_string(),
            flavor_affinity: flavor_affinity.to_string(),
            checksum: checksum.to_string(),
        }
    }
}
