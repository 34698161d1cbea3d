//! Headless walk-through of a volume pipeline: build, re-sync, swap data, edit a caller-owned
//! transfer function and tear down.

use prism_bridge::{DataRange, NativeBridge, ObjectKind};
use prism_headless::HeadlessBridge;
use prism_ids::{NodeKey, ObjectID};
use prism_runtime::{
    ImageDataProps, NodeDesc, PassReport, RendererProps, RepresentationProps, Scene, SyncConfig,
    ViewProps,
};
use prism_variant::{PropertyBag, Variant};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

const VOLUME_PATH: [&str; 3] = ["view", "renderer", "volume"];

#[derive(Debug, Clone, PartialEq)]
pub struct DemoSummary {
    pub passes: Vec<PassReport>,
    pub pumped_renders: usize,
    pub data_range: DataRange,
    pub data_changed_events: usize,
    pub leaked_subscriptions: usize,
}

fn scalar_ramp(len: usize, min: f64, max: f64) -> Vec<f64> {
    if len < 2 {
        return vec![min; len];
    }
    let last = (len - 1) as f64;
    (0..len).map(|i| min + (max - min) * i as f64 / last).collect()
}

fn tree(scalars: ObjectID, opacity: ObjectID) -> Vec<NodeDesc> {
    let mapper = PropertyBag::from_json(&json!({
        "sampleDistance": 0.7,
        "blendMode": "composite",
    }))
    .unwrap_or_default();
    let window = PropertyBag::new()
        .with("title", "prism")
        .with("size", Variant::Array(vec![Variant::from(800u32), Variant::from(600u32)]));

    let volume = RepresentationProps {
        mapper,
        property: PropertyBag::new().with("shade", true),
        scalar_opacity_functions: vec![Some(opacity)],
        ..Default::default()
    };
    let image = ImageDataProps {
        data: PropertyBag::new()
            .with("dimensions", [4.0, 4.0, 4.0])
            .with("spacing", [1.0, 1.0, 1.0]),
        scalars: Some(scalars),
    };

    vec![NodeDesc::view("view", ViewProps { window }).with_child(
        NodeDesc::renderer("renderer", RendererProps::default()).with_child(
            NodeDesc::volume("volume", volume).with_child(NodeDesc::image_data("image", image)),
        ),
    )]
}

pub fn run(config: SyncConfig) -> DemoSummary {
    let mut scene = Scene::with_config(HeadlessBridge::new(), config);
    let bridge = scene.bridge_mut();
    let narrow = bridge.create_array(scalar_ramp(64, 0.0, 10.0), 1);
    let wide = bridge.create_array(scalar_ramp(64, -5.0, 20.0), 1);
    let opacity = bridge.create_external(ObjectKind::PiecewiseFunction);

    let mut passes = Vec::new();
    passes.push(scene.sync(&tree(narrow, opacity)));

    let path = VOLUME_PATH.map(NodeKey::from_string);
    let handle = scene
        .find(&path)
        .and_then(|node| scene.representation_handle(node));
    let changed = Rc::new(Cell::new(0usize));
    if let Some(handle) = handle {
        let counter = Rc::clone(&changed);
        scene.on_data_changed(handle, move |data| {
            counter.set(counter.get() + 1);
            log::info!("volume data changed; input is {data:?}");
        });
    }

    passes.push(scene.sync(&tree(narrow, opacity)));
    passes.push(scene.sync(&tree(wide, opacity)));

    scene
        .bridge_mut()
        .modify_external(opacity, "points", Variant::Array(vec![Variant::range(0.0, 1.0)]));
    let pumped_renders = scene.pump_events();

    let data_range = handle
        .map(|handle| scene.data_range(handle))
        .unwrap_or(DataRange::EMPTY);
    for (index, report) in passes.iter().enumerate() {
        log::info!(
            "pass {}: created {} destroyed {} renders {}",
            index + 1,
            report.created,
            report.destroyed,
            report.renders
        );
    }
    log::info!(
        "range after swap: [{}, {}]; {} draw(s) from external edits",
        data_range.min,
        data_range.max,
        pumped_renders
    );

    passes.push(scene.clear());
    let stats = scene.bridge().stats();
    log::debug!("bridge stats: {stats:?}");
    DemoSummary {
        passes,
        pumped_renders,
        data_range,
        data_changed_events: changed.get(),
        leaked_subscriptions: scene.bridge().live_subscriptions(),
    }
}
