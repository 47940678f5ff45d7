//! DevScout — a synthetic in-memory fleet.
//!
//! Lets the director run end-to-end without real infrastructure:
//! inventory is deterministic, and issued directives mutate the
//! in-memory cache state so consecutive cycles converge the same way a
//! real fleet would.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use ember_director::Scout;
use ember_strategy::{Directive, FlavorInput, ImageInput, NodeInput};

const FLAVORS: &[&str] = &["io", "memory", "compute"];
const NODES_PER_FLAVOR: usize = 4;

/// In-memory scout for development and dry-run operation.
pub struct DevScout {
    nodes: Mutex<Vec<NodeInput>>,
    images: Vec<ImageInput>,
}

impl DevScout {
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        for flavor in FLAVORS {
            for i in 0..NODES_PER_FLAVOR {
                // One node per flavor starts provisioned so the fleet
                // is not uniformly idle.
                let provisioned = i == 0;
                nodes.push(NodeInput::new(
                    &format!("{flavor}-{i:02}"),
                    flavor,
                    provisioned,
                    false,
                ));
            }
        }

        let images = FLAVORS
            .iter()
            .flat_map(|flavor| {
                [
                    ImageInput::new("ubuntu-22.04", flavor, &format!("sha-ubuntu-{flavor}")),
                    ImageInput::new("debian-12", flavor, &format!("sha-debian-{flavor}")),
                ]
            })
            .collect();

        Self {
            nodes: Mutex::new(nodes),
            images,
        }
    }
}

impl Default for DevScout {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scout for DevScout {
    async fn retrieve_node_data(&self) -> anyhow::Result<Vec<NodeInput>> {
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn retrieve_flavor_data(&self) -> anyhow::Result<Vec<FlavorInput>> {
        Ok(FLAVORS.iter().map(|f| FlavorInput::by_name(f)).collect())
    }

    async fn retrieve_image_data(&self) -> anyhow::Result<Vec<ImageInput>> {
        Ok(self.images.clone())
    }

    async fn issue_action(&self, directive: &Directive) -> anyhow::Result<()> {
        let mut nodes = self.nodes.lock().unwrap();
        let node = nodes
            .iter_mut()
            .find(|n| n.node_id == directive.node_id())
            .ok_or_else(|| anyhow::anyhow!("unknown node: {}", directive.node_id()))?;

        match directive {
            Directive::CacheNode { checksum, image_name, .. } => {
                // Idempotent: caching an already-held checksum changes nothing.
                node.cached_checksum = Some(checksum.clone());
                info!(node = %node.node_id, image = %image_name, "dev fleet: image cached");
            }
            Directive::EjectNode { .. } => {
                node.cached_checksum = None;
                info!(node = %node.node_id, "dev fleet: image ejected");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use ember_director::{CycleOutcome, DirectorConfig, DirectorScheduler, refresh_reference_data};
    use ember_strategy::ProportionalStrategy;

    #[tokio::test]
    async fn inventory_is_deterministic() {
        let scout = DevScout::new();
        let first = scout.retrieve_node_data().await.unwrap();
        let second = scout.retrieve_node_data().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), FLAVORS.len() * NODES_PER_FLAVOR);
    }

    #[tokio::test]
    async fn cache_and_eject_mutate_the_fleet() {
        let scout = DevScout::new();

        scout
            .issue_action(&Directive::cache("io-01", "ubuntu-22.04", "sha-ubuntu-io"))
            .await
            .unwrap();
        let nodes = scout.retrieve_node_data().await.unwrap();
        let node = nodes.iter().find(|n| n.node_id == "io-01").unwrap();
        assert_eq!(node.cached_checksum.as_deref(), Some("sha-ubuntu-io"));

        scout.issue_action(&Directive::eject("io-01")).await.unwrap();
        let nodes = scout.retrieve_node_data().await.unwrap();
        let node = nodes.iter().find(|n| n.node_id == "io-01").unwrap();
        assert!(node.cached_checksum.is_none());
    }

    #[tokio::test]
    async fn unknown_node_is_an_error() {
        let scout = DevScout::new();
        let result = scout.issue_action(&Directive::eject("nope-00")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn director_converges_against_the_dev_fleet() {
        let scout = Arc::new(DevScout::new());
        let strategy = Box::new(ProportionalStrategy::new(0.5));
        let mut scheduler = DirectorScheduler::new(
            scout.clone(),
            strategy,
            DirectorConfig::default(),
        );

        let scout_dyn: Arc<dyn Scout> = scout.clone();
        refresh_reference_data(&scout_dyn, &scheduler.reference())
            .await
            .unwrap();

        // First cycle warms nodes up to the per-flavor target.
        let outcome = scheduler.issue_directives().await.unwrap();
        let CycleOutcome::Dispatched { issued, failed } = outcome else {
            panic!("expected dispatch, got {outcome:?}");
        };
        assert!(issued > 0);
        assert_eq!(failed, 0);

        // Second cycle: the fleet already matches the target.
        let outcome = scheduler.issue_directives().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Dispatched { issued: 0, failed: 0 });
    }
}
