//! DOM-free mount surface.
//!
//! A `Surface` stands in for the container element an engine renders into.
//! Engines attach one node on construction and detach it on destroy, which
//! lets platform layers (and tests) see exactly which engine resources are
//! still alive. Cloning a surface yields another handle to the same
//! container.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

/// Identifier of a node attached to a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

#[derive(Debug)]
struct MountedNode {
    id: NodeId,
    class: SmolStr,
}

#[derive(Debug, Default)]
struct SurfaceState {
    id: SmolStr,
    nodes: Vec<MountedNode>,
    next_node: u64,
}

/// Container placeholder engines mount onto.
#[derive(Clone)]
pub struct Surface {
    inner: Rc<RefCell<SurfaceState>>,
}

impl Surface {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SurfaceState {
                id: id.into(),
                ..Default::default()
            })),
        }
    }

    pub fn id(&self) -> SmolStr {
        self.inner.borrow().id.clone()
    }

    /// Attach a child node with the given class name.
    pub fn attach(&self, class: impl Into<SmolStr>) -> NodeId {
        let mut state = self.inner.borrow_mut();
        let id = NodeId(state.next_node);
        state.next_node += 1;
        let class = class.into();
        tracing::trace!(target: "wp_editor::surface", surface = %state.id, %class, "attach node");
        state.nodes.push(MountedNode { id, class });
        id
    }

    /// Detach a node. Returns false if it was not attached.
    pub fn detach(&self, node: NodeId) -> bool {
        let mut state = self.inner.borrow_mut();
        let before = state.nodes.len();
        state.nodes.retain(|n| n.id != node);
        before != state.nodes.len()
    }

    /// Number of nodes currently attached.
    pub fn child_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Class names of attached nodes, in attach order.
    pub fn classes(&self) -> Vec<SmolStr> {
        self.inner
            .borrow()
            .nodes
            .iter()
            .map(|n| n.class.clone())
            .collect()
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Surface")
            .field("id", &state.id)
            .field("children", &state.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_detach() {
        let surface = Surface::new("editor");
        let other = surface.clone();
        let a = surface.attach("jar");
        let b = surface.attach("gutter");
        assert_eq!(other.child_count(), 2);
        assert!(surface.detach(a));
        assert!(!surface.detach(a));
        assert_eq!(other.classes(), vec![SmolStr::new("gutter")]);
        assert!(surface.detach(b));
        assert_eq!(surface.child_count(), 0);
    }
}
