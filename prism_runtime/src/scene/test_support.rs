use crate::{ImageDataProps, NodeDesc, RendererProps, RepresentationProps, Scene, ViewProps};
use prism_bridge::NativeBridge;
use prism_headless::HeadlessBridge;
use prism_ids::{NodeID, NodeKey, ObjectID};

pub fn scene() -> Scene<HeadlessBridge> {
    Scene::new(HeadlessBridge::new())
}

pub fn image(scalars: Option<ObjectID>) -> ImageDataProps {
    ImageDataProps {
        scalars,
        ..Default::default()
    }
}

/// `view > renderer > volume > image`
pub fn volume_tree(volume: RepresentationProps, image: ImageDataProps) -> Vec<NodeDesc> {
    vec![NodeDesc::view("view", ViewProps::default()).with_child(
        NodeDesc::renderer("renderer", RendererProps::default()).with_child(
            NodeDesc::volume("volume", volume).with_child(NodeDesc::image_data("image", image)),
        ),
    )]
}

/// `view > renderer > volume` without a data source.
pub fn bare_volume_tree(volume: RepresentationProps) -> Vec<NodeDesc> {
    vec![NodeDesc::view("view", ViewProps::default()).with_child(
        NodeDesc::renderer("renderer", RendererProps::default())
            .with_child(NodeDesc::volume("volume", volume)),
    )]
}

pub fn node_at(scene: &Scene<HeadlessBridge>, path: &[&str]) -> NodeID {
    let keys: Vec<NodeKey> = path.iter().map(|k| NodeKey::from_string(k)).collect();
    scene
        .find(&keys)
        .unwrap_or_else(|| panic!("no node at {path:?}"))
}

pub fn volume_node(scene: &Scene<HeadlessBridge>) -> NodeID {
    node_at(scene, &["view", "renderer", "volume"])
}

pub fn window_of(scene: &Scene<HeadlessBridge>) -> ObjectID {
    scene
        .view_handle(node_at(scene, &["view"]))
        .expect("view reconciled")
        .window()
}

pub fn renderer_of(scene: &Scene<HeadlessBridge>) -> ObjectID {
    scene
        .renderer_handle(node_at(scene, &["view", "renderer"]))
        .expect("renderer reconciled")
        .renderer()
}

pub fn actor_of_path(scene: &Scene<HeadlessBridge>, path: &[&str]) -> ObjectID {
    scene
        .node(node_at(scene, path))
        .and_then(|n| n.as_representation())
        .and_then(|rep| rep.actor())
        .expect("actor constructed")
}

pub fn actor_of(scene: &Scene<HeadlessBridge>) -> ObjectID {
    actor_of_path(scene, &["view", "renderer", "volume"])
}

pub fn mapper_of(scene: &Scene<HeadlessBridge>) -> ObjectID {
    scene
        .node(volume_node(scene))
        .and_then(|n| n.as_representation())
        .and_then(|rep| rep.mapper())
        .expect("mapper resolved")
}

pub fn property_of(scene: &Scene<HeadlessBridge>) -> ObjectID {
    let actor = actor_of(scene);
    scene
        .bridge()
        .object(actor)
        .and_then(|a| a.property)
        .expect("property sub-object exists")
}

pub fn visibility_of(scene: &Scene<HeadlessBridge>) -> Option<bool> {
    scene
        .bridge()
        .get_property(actor_of(scene), "visibility")
        .and_then(|v| v.as_bool())
}

