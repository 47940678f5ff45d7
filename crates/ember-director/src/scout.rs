//! The `Scout` capability — inventory retrieval and action dispatch.

use async_trait::async_trait;

use ember_strategy::{Directive, FlavorInput, ImageInput, NodeInput};

/// The capability that reports live fleet state and executes directives
/// against real infrastructure.
///
/// Node data is volatile and pulled fresh on every decision cycle;
/// flavor and image data change rarely and are pulled by a coarser
/// refresh task. Retry, timeout, and re-authentication against the
/// underlying infrastructure APIs are the scout's concern — the
/// director treats every method as a single fallible call.
#[async_trait]
pub trait Scout: Send + Sync {
    /// Pull the current node inventory.
    async fn retrieve_node_data(&self) -> anyhow::Result<Vec<NodeInput>>;

    /// Pull flavor definitions.
    async fn retrieve_flavor_data(&self) -> anyhow::Result<Vec<FlavorInput>>;

    /// Pull image definitions.
    async fn retrieve_image_data(&self) -> anyhow::Result<Vec<ImageInput>>;

    /// Apply one directive to the fleet. Re-issuing a `CacheNode` for a
    /// checksum the node already holds must be a no-op.
    async fn issue_action(&self, directive: &Directive) -> anyhow::Result<()>;
}
