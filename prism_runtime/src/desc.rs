use crate::data_range::ColorDataRange;
use crate::nodes::NodeKind;
use prism_ids::{NodeKey, ObjectID};
use prism_variant::PropertyBag;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewProps {
    pub window: PropertyBag,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererProps {
    pub renderer: PropertyBag,
}

/// Shared by volume and geometry representations. Geometry ignores the slot lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepresentationProps {
    pub mapper: PropertyBag,
    /// Caller-owned mapper used instead of constructing one. Never destroyed by the scene.
    pub mapper_instance: Option<ObjectID>,
    pub actor: PropertyBag,
    /// Applied to the actor's property sub-object.
    pub property: PropertyBag,
    pub color_map_preset: Option<Arc<str>>,
    pub color_data_range: ColorDataRange,
    pub color_transfer_functions: Vec<Option<ObjectID>>,
    pub scalar_opacity_functions: Vec<Option<ObjectID>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDataProps {
    pub data: PropertyBag,
    /// Caller-owned point scalars bound to the image.
    pub scalars: Option<ObjectID>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    View(ViewProps),
    Renderer(RendererProps),
    VolumeRepresentation(RepresentationProps),
    GeometryRepresentation(RepresentationProps),
    ImageData(ImageDataProps),
}

impl NodeSpec {
    pub const fn kind(&self) -> NodeKind {
        match self {
            NodeSpec::View(_) => NodeKind::View,
            NodeSpec::Renderer(_) => NodeKind::Renderer,
            NodeSpec::VolumeRepresentation(_) => NodeKind::VolumeRepresentation,
            NodeSpec::GeometryRepresentation(_) => NodeKind::GeometryRepresentation,
            NodeSpec::ImageData(_) => NodeKind::ImageData,
        }
    }
}

/// One node of the declarative tree a pass reconciles against.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDesc {
    pub key: NodeKey,
    pub spec: NodeSpec,
    pub children: Vec<NodeDesc>,
}

impl NodeDesc {
    pub fn new(key: impl Into<NodeKey>, spec: NodeSpec) -> Self {
        Self {
            key: key.into(),
            spec,
            children: Vec::new(),
        }
    }

    pub fn view(key: impl Into<NodeKey>, props: ViewProps) -> Self {
        Self::new(key, NodeSpec::View(props))
    }

    pub fn renderer(key: impl Into<NodeKey>, props: RendererProps) -> Self {
        Self::new(key, NodeSpec::Renderer(props))
    }

    pub fn volume(key: impl Into<NodeKey>, props: RepresentationProps) -> Self {
        Self::new(key, NodeSpec::VolumeRepresentation(props))
    }

    pub fn geometry(key: impl Into<NodeKey>, props: RepresentationProps) -> Self {
        Self::new(key, NodeSpec::GeometryRepresentation(props))
    }

    pub fn image_data(key: impl Into<NodeKey>, props: ImageDataProps) -> Self {
        Self::new(key, NodeSpec::ImageData(props))
    }

    pub fn with_child(mut self, child: NodeDesc) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeDesc>) -> Self {
        self.children.extend(children);
        self
    }
}
