mod image_data;
mod representation;
mod view;

pub use image_data::{DataSignal, ImageDataState};
pub use representation::{RepresentationFlavor, RepresentationState, Watch};
pub use view::{RendererState, ViewState};

use prism_ids::{NodeID, NodeKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    View,
    Renderer,
    VolumeRepresentation,
    GeometryRepresentation,
    ImageData,
}

pub enum NodeData {
    View(ViewState),
    Renderer(RendererState),
    Representation(RepresentationState),
    ImageData(ImageDataState),
}

impl NodeData {
    pub fn new_view() -> Self {
        NodeData::View(ViewState::new())
    }

    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::View => NodeData::View(ViewState::new()),
            NodeKind::Renderer => NodeData::Renderer(RendererState::new()),
            NodeKind::VolumeRepresentation => {
                NodeData::Representation(RepresentationState::new(RepresentationFlavor::Volume))
            }
            NodeKind::GeometryRepresentation => {
                NodeData::Representation(RepresentationState::new(RepresentationFlavor::Geometry))
            }
            NodeKind::ImageData => NodeData::ImageData(ImageDataState::new()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::View(_) => NodeKind::View,
            NodeData::Renderer(_) => NodeKind::Renderer,
            NodeData::Representation(rep) => rep.flavor().kind(),
            NodeData::ImageData(_) => NodeKind::ImageData,
        }
    }
}

/// One reconciled node: the identity it was matched by plus the native objects it owns.
pub struct SceneNode {
    pub key: NodeKey,
    pub parent: NodeID,
    pub children: Vec<NodeID>,
    pub data: NodeData,
}

impl SceneNode {
    pub fn new(key: NodeKey, parent: NodeID, data: NodeData) -> Self {
        Self {
            key,
            parent,
            children: Vec::new(),
            data,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn as_representation(&self) -> Option<&RepresentationState> {
        match &self.data {
            NodeData::Representation(rep) => Some(rep),
            _ => None,
        }
    }

    pub fn as_representation_mut(&mut self) -> Option<&mut RepresentationState> {
        match &mut self.data {
            NodeData::Representation(rep) => Some(rep),
            _ => None,
        }
    }
}
