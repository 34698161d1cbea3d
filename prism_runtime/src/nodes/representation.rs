use super::NodeKind;
use crate::config::SyncConfig;
use crate::context::{DownstreamHandle, RepresentationHandle, SyncContext};
use crate::data_range::{ColorDataRange, DataRangeObserver};
use crate::desc::RepresentationProps;
use crate::differ::{PropertyState, TransferSlots};
use crate::dirty::DirtyAccumulator;
use crate::events::DataEventHub;
use crate::modified::ModifiedSubscriptions;
use crate::registry::ObjectSlot;
use prism_bridge::{DataRange, NativeBridge, ObjectKind, SlotKind, SubObject};
use prism_ids::{NodeID, ObjectID, SubscriptionID};
use prism_variant::{PropertyBag, Variant};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationFlavor {
    Volume,
    Geometry,
}

impl RepresentationFlavor {
    pub const fn kind(self) -> NodeKind {
        match self {
            RepresentationFlavor::Volume => NodeKind::VolumeRepresentation,
            RepresentationFlavor::Geometry => NodeKind::GeometryRepresentation,
        }
    }

    pub const fn mapper_kind(self) -> ObjectKind {
        match self {
            RepresentationFlavor::Volume => ObjectKind::VolumeMapper,
            RepresentationFlavor::Geometry => ObjectKind::Mapper,
        }
    }

    pub const fn actor_kind(self) -> ObjectKind {
        match self {
            RepresentationFlavor::Volume => ObjectKind::Volume,
            RepresentationFlavor::Geometry => ObjectKind::Actor,
        }
    }
}

/// Which of a representation's subscriptions a modified notification arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    TransferFunction,
    ScalarArray,
}

/// Mapper, actor and color mapping of one representation, plus its data state.
///
/// The actor stays hidden until a data source reports data available; declared
/// `visibility: false` keeps it hidden afterwards.
pub struct RepresentationState {
    flavor: RepresentationFlavor,
    node: NodeID,
    scope: Option<NodeID>,

    mapper: ObjectSlot,
    external_mapper: Option<ObjectID>,
    actor: ObjectSlot,
    lookup_table: ObjectSlot,
    opacity_ramp: ObjectSlot,

    mapper_props: PropertyState,
    actor_props: PropertyState,
    property_props: PropertyState,
    lookup_props: PropertyState,
    ramp_props: PropertyState,
    binding_props: PropertyState,
    color_slots: TransferSlots,
    opacity_slots: TransferSlots,

    wired_mapper: Option<(ObjectID, ObjectID)>,
    bound_defaults: Option<(ObjectID, ObjectID, ObjectID)>,
    renderer: Option<ObjectID>,

    function_watch: ModifiedSubscriptions,
    array_watch: ModifiedSubscriptions,

    data_available: bool,
    declared_actor: PropertyBag,
    preset: Arc<str>,
    range_mode: ColorDataRange,
    range: DataRangeObserver,

    pub(crate) events: DataEventHub,
}

impl RepresentationState {
    pub fn new(flavor: RepresentationFlavor) -> Self {
        Self {
            flavor,
            node: NodeID::nil(),
            scope: None,
            mapper: ObjectSlot::new(flavor.mapper_kind()),
            external_mapper: None,
            actor: ObjectSlot::new(flavor.actor_kind()),
            lookup_table: ObjectSlot::new(ObjectKind::ColorTransferFunction),
            opacity_ramp: ObjectSlot::new(ObjectKind::PiecewiseFunction),
            mapper_props: PropertyState::new(),
            actor_props: PropertyState::new(),
            property_props: PropertyState::new(),
            lookup_props: PropertyState::new(),
            ramp_props: PropertyState::new(),
            binding_props: PropertyState::new(),
            color_slots: TransferSlots::new(SlotKind::Color),
            opacity_slots: TransferSlots::new(SlotKind::Opacity),
            wired_mapper: None,
            bound_defaults: None,
            renderer: None,
            function_watch: ModifiedSubscriptions::new(),
            array_watch: ModifiedSubscriptions::new(),
            data_available: false,
            declared_actor: PropertyBag::new(),
            preset: Arc::<str>::from(""),
            range_mode: ColorDataRange::Auto,
            range: DataRangeObserver::new(),
            events: DataEventHub::new(),
        }
    }

    #[inline]
    pub fn flavor(&self) -> RepresentationFlavor {
        self.flavor
    }

    #[inline]
    pub fn actor(&self) -> Option<ObjectID> {
        self.actor.peek()
    }

    /// The caller-supplied mapper when one is set, otherwise the owned one.
    #[inline]
    pub fn mapper(&self) -> Option<ObjectID> {
        self.external_mapper.or(self.mapper.peek())
    }

    #[inline]
    pub fn lookup_table(&self) -> Option<ObjectID> {
        self.lookup_table.peek()
    }

    #[inline]
    pub fn opacity_ramp(&self) -> Option<ObjectID> {
        self.opacity_ramp.peek()
    }

    #[inline]
    pub fn is_data_available(&self) -> bool {
        self.data_available
    }

    /// Last resolved color range; [`DataRange::EMPTY`] until data arrives in auto mode.
    #[inline]
    pub fn data_range(&self) -> DataRange {
        self.range.current(self.range_mode)
    }

    #[inline]
    pub fn range_recomputations(&self) -> u32 {
        self.range.recomputations()
    }

    #[inline]
    pub(crate) fn scope(&self) -> Option<NodeID> {
        self.scope
    }

    pub fn input_data<B: NativeBridge + ?Sized>(&self, bridge: &B) -> Option<ObjectID> {
        bridge.input_data(self.mapper()?)
    }

    pub(crate) fn handles(
        &self,
        node: NodeID,
    ) -> (Option<RepresentationHandle>, Option<DownstreamHandle>) {
        let Some(mapper) = self.mapper() else {
            return (None, None);
        };
        let representation = self.actor().map(|actor| RepresentationHandle {
            node,
            actor,
            mapper,
        });
        (representation, Some(DownstreamHandle { node, mapper }))
    }

    pub(crate) fn watch_kind(&self, subscription: SubscriptionID) -> Option<Watch> {
        if self.function_watch.holds(subscription) {
            Some(Watch::TransferFunction)
        } else if self.array_watch.holds(subscription) {
            Some(Watch::ScalarArray)
        } else {
            None
        }
    }

    pub(crate) fn sync<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        node: NodeID,
        props: &RepresentationProps,
        ctx: &SyncContext,
        config: &SyncConfig,
    ) -> bool {
        self.node = node;
        self.scope = ctx.scope();
        let mut dirty = DirtyAccumulator::new();

        let mapper = self.mapper.get_or_external(bridge, props.mapper_instance);
        if self.external_mapper != props.mapper_instance {
            log::debug!("representation {node} now drives mapper {mapper}");
            self.external_mapper = props.mapper_instance;
        }
        dirty.track(self.mapper_props.apply(bridge, mapper, &props.mapper));

        let actor = self.actor.get(bridge);
        if self.wired_mapper != Some((actor, mapper)) {
            dirty.track(bridge.set_mapper(actor, mapper));
            self.wired_mapper = Some((actor, mapper));
        }
        dirty.track(self.attach(bridge, actor, ctx.renderer.map(|r| r.renderer)));

        if self.declared_actor != props.actor {
            self.declared_actor = props.actor.clone();
        }
        dirty.track(self.apply_actor(bridge, actor));

        let property = bridge.sub_object(actor, SubObject::Property);
        match property {
            Some(property) => {
                dirty.track(self.property_props.apply(bridge, property, &props.property))
            }
            None => log::warn!("actor {actor} exposes no property object"),
        }

        self.preset = props
            .color_map_preset
            .clone()
            .unwrap_or_else(|| Arc::clone(&config.default_color_preset));
        self.range_mode = props.color_data_range;
        dirty.track(self.refresh_color_mapping(bridge));

        let watched = match (self.flavor, property) {
            (RepresentationFlavor::Volume, Some(property)) => {
                dirty.track(self.bind_volume_functions(bridge, property, props, config));
                watched_functions(props)
            }
            _ => Vec::new(),
        };
        self.function_watch.sync(bridge, node, &watched);
        self.sync_array_watch(bridge);

        dirty.consume_and_reset()
    }

    /// Records whether data is bound. Returns `(native changed, became available)`.
    pub(crate) fn set_data_available<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        available: bool,
    ) -> (bool, bool) {
        let became = available && !self.data_available;
        self.data_available = available;
        let changed = match self.actor.peek() {
            Some(actor) => self.apply_actor(bridge, actor),
            None => false,
        };
        (changed, became)
    }

    /// Recomputes the auto range and pushes it into the color mapping.
    pub(crate) fn refresh_data<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) -> bool {
        self.range.invalidate();
        let changed = self.refresh_color_mapping(bridge);
        self.sync_array_watch(bridge);
        changed
    }

    pub(crate) fn release<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) {
        self.function_watch.release(bridge);
        self.array_watch.release(bridge);
        if let (Some(renderer), Some(actor)) = (self.renderer.take(), self.actor.peek()) {
            bridge.remove_actor(renderer, actor);
        }
        self.actor.release(bridge);
        self.mapper.release(bridge);
        self.lookup_table.release(bridge);
        self.opacity_ramp.release(bridge);
        self.external_mapper = None;
    }

    fn attach<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        actor: ObjectID,
        renderer: Option<ObjectID>,
    ) -> bool {
        if self.renderer == renderer {
            return false;
        }
        let mut changed = false;
        if let Some(old) = self.renderer {
            changed |= bridge.remove_actor(old, actor);
        }
        match renderer {
            Some(new) => changed |= bridge.add_actor(new, actor),
            None => log::warn!("representation {} has no enclosing renderer", self.node),
        }
        self.renderer = renderer;
        changed
    }

    fn apply_actor<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B, actor: ObjectID) -> bool {
        let declared_visible = self
            .declared_actor
            .get("visibility")
            .and_then(Variant::as_bool)
            .unwrap_or(true);
        let bag = self
            .declared_actor
            .clone()
            .with("visibility", self.data_available && declared_visible);
        self.actor_props.apply(bridge, actor, &bag)
    }

    fn resolve_range<B: NativeBridge + ?Sized>(&mut self, bridge: &B) -> DataRange {
        let mapper = self.mapper();
        self.range.resolve(self.range_mode, bridge, |bridge| {
            let data = bridge.input_data(mapper?)?;
            bridge.scalars(data)
        })
    }

    fn refresh_color_mapping<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) -> bool {
        let range = self.resolve_range(bridge);
        // An empty range carries no bounds worth pushing; native defaults stay until data arrives.
        let bounds = (!range.is_empty()).then(|| range.to_variant());
        let lookup_table = self.lookup_table.get(bridge);
        let mut lookup = PropertyBag::new().with("preset", Arc::clone(&self.preset));
        if let Some(bounds) = &bounds {
            lookup.set("mappingRange", bounds.clone());
        }
        let mut changed = self.lookup_props.apply(bridge, lookup_table, &lookup);

        match self.flavor {
            RepresentationFlavor::Volume => {
                let ramp = self.opacity_ramp.get(bridge);
                let mut bag = PropertyBag::new();
                if let Some(bounds) = bounds {
                    bag.set("ramp", bounds);
                }
                changed |= self.ramp_props.apply(bridge, ramp, &bag);
            }
            RepresentationFlavor::Geometry => {
                if let Some(mapper) = self.mapper() {
                    let mut bag = PropertyBag::new().with("lookupTable", lookup_table);
                    if let Some(bounds) = bounds {
                        bag.set("scalarRange", bounds);
                    }
                    changed |= self.binding_props.apply(bridge, mapper, &bag);
                }
            }
        }
        changed
    }

    fn bind_volume_functions<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        property: ObjectID,
        props: &RepresentationProps,
        config: &SyncConfig,
    ) -> bool {
        let mut changed = false;
        let lookup_table = self.lookup_table.get(bridge);
        let ramp = self.opacity_ramp.get(bridge);
        let defaults = (property, lookup_table, ramp);
        if self.bound_defaults != Some(defaults) {
            changed |= bind_slot(bridge, property, SlotKind::Color, lookup_table);
            changed |= bind_slot(bridge, property, SlotKind::Opacity, ramp);
            if config.linear_interpolation {
                let bag = PropertyBag::new().with("interpolationType", "linear");
                changed |= self.binding_props.apply(bridge, property, &bag);
            }
            self.bound_defaults = Some(defaults);
            // Slot 0 was just overwritten; user functions must be pushed again.
            self.color_slots = TransferSlots::new(SlotKind::Color);
            self.opacity_slots = TransferSlots::new(SlotKind::Opacity);
        }
        changed |= self
            .color_slots
            .apply(bridge, property, &props.color_transfer_functions);
        changed |= self
            .opacity_slots
            .apply(bridge, property, &props.scalar_opacity_functions);
        changed
    }

    fn sync_array_watch<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) {
        let array = match self.range_mode {
            ColorDataRange::Auto => self.range.observed_array(),
            ColorDataRange::Fixed(_) => None,
        };
        let targets: Vec<ObjectID> = array.into_iter().collect();
        self.array_watch.sync(bridge, self.node, &targets);
    }
}

fn bind_slot<B: NativeBridge + ?Sized>(
    bridge: &mut B,
    property: ObjectID,
    kind: SlotKind,
    function: ObjectID,
) -> bool {
    match bridge.set_transfer_slot(property, kind, 0, Some(function)) {
        Ok(changed) => changed,
        Err(err) => {
            log::warn!("binding default {kind:?} function on {property}: {err}");
            false
        }
    }
}

fn watched_functions(props: &RepresentationProps) -> Vec<ObjectID> {
    props
        .color_transfer_functions
        .iter()
        .chain(props.scalar_opacity_functions.iter())
        .flatten()
        .copied()
        .collect()
}
