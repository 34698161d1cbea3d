//! Handles a node hands to its subtree.
//!
//! Descendants never search for their ancestors; each node reconciles with a [`SyncContext`]
//! holding copies of the handles its ancestors published. Handles are plain ids: after the
//! publishing node is removed, every handle operation on [`crate::Scene`] becomes a no-op.

use prism_ids::{NodeID, ObjectID};

/// Published by a View: the render scope and its native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle {
    pub(crate) node: NodeID,
    pub(crate) window: ObjectID,
}

impl ViewHandle {
    #[inline]
    pub const fn node(&self) -> NodeID {
        self.node
    }

    #[inline]
    pub const fn window(&self) -> ObjectID {
        self.window
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererHandle {
    pub(crate) node: NodeID,
    pub(crate) renderer: ObjectID,
}

impl RendererHandle {
    #[inline]
    pub const fn node(&self) -> NodeID {
        self.node
    }

    #[inline]
    pub const fn renderer(&self) -> ObjectID {
        self.renderer
    }
}

/// Published by a representation for data-source descendants to report through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepresentationHandle {
    pub(crate) node: NodeID,
    pub(crate) actor: ObjectID,
    pub(crate) mapper: ObjectID,
}

impl RepresentationHandle {
    #[inline]
    pub const fn node(&self) -> NodeID {
        self.node
    }
}

/// The object data-source descendants feed: the representation's mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DownstreamHandle {
    pub(crate) node: NodeID,
    pub(crate) mapper: ObjectID,
}

impl DownstreamHandle {
    #[inline]
    pub const fn node(&self) -> NodeID {
        self.node
    }

    #[inline]
    pub const fn mapper(&self) -> ObjectID {
        self.mapper
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncContext {
    pub view: Option<ViewHandle>,
    pub renderer: Option<RendererHandle>,
    pub representation: Option<RepresentationHandle>,
    pub downstream: Option<DownstreamHandle>,
}

impl SyncContext {
    pub const fn root() -> Self {
        Self {
            view: None,
            renderer: None,
            representation: None,
            downstream: None,
        }
    }

    /// A view starts a fresh render scope; nothing from outside it leaks in.
    pub fn with_view(self, view: Option<ViewHandle>) -> Self {
        Self {
            view,
            ..Self::root()
        }
    }

    pub fn with_renderer(self, renderer: Option<RendererHandle>) -> Self {
        Self {
            renderer,
            representation: None,
            downstream: None,
            ..self
        }
    }

    pub fn with_representation(
        self,
        representation: Option<RepresentationHandle>,
        downstream: Option<DownstreamHandle>,
    ) -> Self {
        Self {
            representation,
            downstream,
            ..self
        }
    }

    /// Node whose dirty accumulator collects changes made under this context.
    #[inline]
    pub fn scope(&self) -> Option<NodeID> {
        self.view.map(|view| view.node)
    }
}
