use ahash::AHashMap;
use prism_bridge::{MAX_COMPONENT_SLOTS, ObjectKind};
use prism_ids::ObjectID;
use prism_variant::Variant;
use std::sync::Arc;

/// In-memory stand-in for one native rendering object.
#[derive(Debug, Clone)]
pub struct HeadlessObject {
    pub kind: ObjectKind,
    pub properties: AHashMap<Arc<str>, Variant>,
    pub color_slots: [Option<ObjectID>; MAX_COMPONENT_SLOTS],
    pub opacity_slots: [Option<ObjectID>; MAX_COMPONENT_SLOTS],
    pub mapper: Option<ObjectID>,
    pub input: Option<ObjectID>,
    pub connection: Option<ObjectID>,
    /// Actors of a renderer, renderers of a window.
    pub children: Vec<ObjectID>,
    pub property: Option<ObjectID>,
    pub scalars: Option<ObjectID>,
    pub values: Vec<f64>,
    pub components: usize,
}

impl HeadlessObject {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            properties: AHashMap::default(),
            color_slots: [None; MAX_COMPONENT_SLOTS],
            opacity_slots: [None; MAX_COMPONENT_SLOTS],
            mapper: None,
            input: None,
            connection: None,
            children: Vec::new(),
            property: None,
            scalars: None,
            values: Vec::new(),
            components: 1,
        }
    }

    #[inline]
    pub fn property_value(&self, key: &str) -> Option<&Variant> {
        self.properties.get(key)
    }
}

/// Property keys each kind accepts; anything else is reported as unsupported.
pub fn supported_keys(kind: ObjectKind) -> &'static [&'static str] {
    match kind {
        ObjectKind::RenderWindow => &["size", "title"],
        ObjectKind::Renderer => &["background", "twoSidedLighting", "layer"],
        ObjectKind::VolumeMapper => &[
            "sampleDistance",
            "blendMode",
            "maximumSamplesPerRay",
            "autoAdjustSampleDistances",
        ],
        ObjectKind::Volume | ObjectKind::Actor => {
            &["visibility", "pickable", "position", "scale", "orientation"]
        }
        ObjectKind::VolumeProperty => &[
            "interpolationType",
            "shade",
            "ambient",
            "diffuse",
            "specular",
            "specularPower",
            "independentComponents",
        ],
        ObjectKind::Mapper => &[
            "scalarVisibility",
            "colorByArrayName",
            "scalarMode",
            "lookupTable",
            "scalarRange",
            "interpolateScalarsBeforeMapping",
        ],
        ObjectKind::ActorProperty => &[
            "color",
            "opacity",
            "pointSize",
            "lineWidth",
            "representation",
            "edgeVisibility",
        ],
        ObjectKind::ColorTransferFunction => &["preset", "mappingRange", "points"],
        ObjectKind::PiecewiseFunction => &["ramp", "points"],
        ObjectKind::ImageData => &["dimensions", "spacing", "origin"],
        ObjectKind::DataArray => &["name"],
    }
}

/// Keys whose value must be a three-component vector.
pub fn expects_vec3(kind: ObjectKind, key: &str) -> bool {
    matches!(kind, ObjectKind::ImageData) && matches!(key, "dimensions" | "spacing" | "origin")
}

pub fn has_slots(kind: ObjectKind) -> bool {
    matches!(kind, ObjectKind::VolumeProperty)
}

pub fn is_mapper(kind: ObjectKind) -> bool {
    matches!(kind, ObjectKind::VolumeMapper | ObjectKind::Mapper)
}

pub fn property_kind_for(kind: ObjectKind) -> Option<ObjectKind> {
    match kind {
        ObjectKind::Volume => Some(ObjectKind::VolumeProperty),
        ObjectKind::Actor => Some(ObjectKind::ActorProperty),
        _ => None,
    }
}

pub struct ObjectStore {
    next_index: u32,
    objects: AHashMap<ObjectID, HeadlessObject>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            next_index: 1,
            objects: AHashMap::default(),
        }
    }

    pub fn insert(&mut self, object: HeadlessObject) -> ObjectID {
        let id = ObjectID::from_parts(self.next_index, 0);
        self.next_index = self.next_index.saturating_add(1);
        self.objects.insert(id, object);
        id
    }

    #[inline]
    pub fn get(&self, id: ObjectID) -> Option<&HeadlessObject> {
        self.objects.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectID) -> Option<&mut HeadlessObject> {
        self.objects.get_mut(&id)
    }

    #[inline]
    pub fn remove(&mut self, id: ObjectID) -> Option<HeadlessObject> {
        self.objects.remove(&id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectID) -> bool {
        self.objects.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}
