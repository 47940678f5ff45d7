//! ember-strategy — directive model and decision strategies.
//!
//! This crate holds the value records the director consumes each cycle
//! (`NodeInput`, `FlavorInput`, `ImageInput`), the `Directive` sum type
//! that strategies emit, the `CacheStrategy` trait, and a deterministic
//! proportional strategy.
//!
//! # Architecture
//!
//! ```text
//! CacheStrategy
//!   ├── input: per-cycle snapshots (nodes, flavors, images)
//!   └── output: ordered Vec<Directive>
//!       ├── CacheNode { node_id, image_name, checksum }
//!       └── EjectNode { node_id }
//! ```
//!
//! Strategies are pure: identical inputs yield identical directive
//! sequences, so the director loop can be tested against scripted
//! strategies without touching real infrastructure.

pub mod directive;
pub mod inputs;
pub mod proportional;
pub mod strategy;

pub use directive::{Directive, DirectiveKind};
pub use inputs::{FlavorInput, ImageInput, NodeInput};
pub use proportional::ProportionalStrategy;
pub use strategy::CacheStrategy;
