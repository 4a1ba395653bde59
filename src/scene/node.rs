use smallvec::SmallVec;

use crate::component::ComponentKey;
use crate::math::Matrix4f;
use crate::scene::NodeHandle;
use crate::scene::context::EngineContext;
use crate::scene::transform::Transform;

/// One element of the scene hierarchy.
///
/// # Hierarchy
///
/// - `parent`: handle of the parent node (`None` for the root and for
///   detached nodes)
/// - `children`: ordered child handles, owned by this node
/// - `components`: ordered keys of the components attached to this node,
///   owned by this node
///
/// Nodes live in the [`Scene`](crate::scene::Scene) arena; removing a node
/// removes its whole subtree and every component on it.
#[derive(Debug)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub(crate) components: SmallVec<[ComponentKey; 4]>,

    pub transform: Transform,

    pub(crate) engines: EngineContext,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            components: SmallVec::new(),
            transform: Transform::new(),
            engines: EngineContext::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn components(&self) -> &[ComponentKey] {
        &self.components
    }

    /// Engine references shared with this node's subtree.
    #[inline]
    #[must_use]
    pub fn engines(&self) -> &EngineContext {
        &self.engines
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Matrix4f {
        self.transform.world_matrix()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}
