//! Directives — the unit of commanded work against a node.

use serde::{Deserialize, Serialize};

use crate::inputs::NodeId;

/// One commanded action against a node.
///
/// `CacheNode` is self-describing: it carries the image name and the
/// content checksum, so re-issuing it against a node that already holds
/// that checksum is a no-op at the scout boundary. `EjectNode` carries
/// no image reference — it removes whatever is cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    CacheNode {
        node_id: NodeId,
        image_name: String,
        checksum: String,
    },
    EjectNode {
        node_id: NodeId,
    },
}

/// Discriminant for `Directive`, used by the rate limiters to pick out
/// the governed kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Cache,
    Eject,
}

impl Directive {
    pub fn cache(node_id: &str, image_name: &str, checksum: &str) -> Self {
        Self::CacheNode {
            node_id: node_id.to_string(),
            image_name: image_name.to_string(),
            checksum: checksum.to_string(),
        }
    }

    pub fn eject(node_id: &str) -> Self {
        Self::EjectNode {
            node_id: node_id.to_string(),
        }
    }

    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::CacheNode { .. } => DirectiveKind::Cache,
            Directive::EjectNode { .. } => DirectiveKind::Eject,
        }
    }

    /// The node this directive targets.
    pub fn node_id(&self) -> &str {
        match self {
            Directive::CacheNode { node_id, .. } => node_id,
            Directive::EjectNode { node_id } => node_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_discriminates_variants() {
        assert_eq!(Directive::cache("n1", "img", "sum").kind(), DirectiveKind::Cache);
        assert_eq!(Directive::eject("n1").kind(), DirectiveKind::Eject);
    }

    #[test]
    fn node_id_for_both_variants() {
        assert_eq!(Directive::cache("n1", "img", "sum").node_id(), "n1");
        assert_eq!(Directive::eject("n2").node_id(), "n2");
    }

    #[test]
    fn serializes_roundtrip() {
        let directive = Directive::cache("n1", "ubuntu", "abc123");
        let json = serde_json::to_string(&directive).unwrap();
        let back: Directive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, directive);
    }
}
