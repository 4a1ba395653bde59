//! Scene Graph
//!
//! - [`Scene`]: arena owning every node and component, and the lifecycle driver
//! - [`Node`]: one element of the hierarchy
//! - [`Transform`]: local TRS with cached local/world matrices
//! - [`transform_system`]: world-matrix propagation over the arena
//! - [`context`]: engine references shared down the hierarchy

pub mod context;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use context::{EngineContext, Shared, shared};
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Identity of a node inside its scene.
    pub struct NodeHandle;
}
