use super::Scene;
use crate::context::{DownstreamHandle, RendererHandle, RepresentationHandle, ViewHandle};
use crate::events::DataEvent;
use crate::nodes::{NodeData, RepresentationState, SceneNode};
use prism_bridge::{DataRange, NativeBridge};
use prism_ids::{ListenerID, NodeID, ObjectID};

impl<B: NativeBridge> Scene<B> {
    pub fn view_handle(&self, node: NodeID) -> Option<ViewHandle> {
        match &self.nodes.get(node)?.data {
            NodeData::View(view) => view.handle(node),
            _ => None,
        }
    }

    pub fn renderer_handle(&self, node: NodeID) -> Option<RendererHandle> {
        match &self.nodes.get(node)?.data {
            NodeData::Renderer(renderer) => renderer.handle(node),
            _ => None,
        }
    }

    pub fn representation_handle(&self, node: NodeID) -> Option<RepresentationHandle> {
        self.nodes.get(node)?.as_representation()?.handles(node).0
    }

    pub fn downstream_handle(&self, node: NodeID) -> Option<DownstreamHandle> {
        self.nodes.get(node)?.as_representation()?.handles(node).1
    }

    fn live_representation(&self, node: NodeID) -> Option<&RepresentationState> {
        self.nodes.get(node)?.as_representation()
    }

    /// Reports whether the representation's data source has bound data.
    ///
    /// Visibility follows immediately; the available event fires only on a false-to-true
    /// transition. Always followed by [`Scene::data_changed`]. Returns `false` for a stale
    /// handle.
    pub fn data_available(&mut self, handle: RepresentationHandle, available: bool) -> bool {
        let Some(rep) = self
            .nodes
            .get_mut(handle.node)
            .and_then(SceneNode::as_representation_mut)
        else {
            log::trace!("data_available on removed representation {}", handle.node);
            return false;
        };
        let (changed, became_available) = rep.set_data_available(&mut self.bridge, available);
        let scope = rep.scope();
        self.track_scope(scope, changed);

        self.data_changed(handle);

        if became_available {
            if let Some(rep) = self
                .nodes
                .get_mut(handle.node)
                .and_then(SceneNode::as_representation_mut)
            {
                let input = rep.input_data(&self.bridge);
                rep.events.dispatch(DataEvent::Available, input);
            }
        }
        true
    }

    /// Recomputes the auto range, refreshes the color mapping, notifies data-changed
    /// listeners and requests a render of the enclosing view.
    pub fn data_changed(&mut self, handle: RepresentationHandle) -> bool {
        let Some(rep) = self
            .nodes
            .get_mut(handle.node)
            .and_then(SceneNode::as_representation_mut)
        else {
            log::trace!("data_changed on removed representation {}", handle.node);
            return false;
        };
        if rep.refresh_data(&mut self.bridge) {
            log::trace!("color mapping of {} follows new data", handle.node);
        }
        let input = rep.input_data(&self.bridge);
        rep.events.dispatch(DataEvent::Changed, input);
        let scope = rep.scope();
        self.track_scope(scope, true);
        true
    }

    pub fn on_data_available(
        &mut self,
        handle: RepresentationHandle,
        listener: impl FnMut(Option<ObjectID>) + 'static,
    ) -> Option<ListenerID> {
        self.subscribe(handle, DataEvent::Available, Box::new(listener))
    }

    pub fn on_data_changed(
        &mut self,
        handle: RepresentationHandle,
        listener: impl FnMut(Option<ObjectID>) + 'static,
    ) -> Option<ListenerID> {
        self.subscribe(handle, DataEvent::Changed, Box::new(listener))
    }

    fn subscribe(
        &mut self,
        handle: RepresentationHandle,
        event: DataEvent,
        listener: crate::events::DataListener,
    ) -> Option<ListenerID> {
        let rep = self
            .nodes
            .get_mut(handle.node)
            .and_then(SceneNode::as_representation_mut)?;
        Some(rep.events.add(event, listener))
    }

    /// Removes a listener added with `on_data_available` or `on_data_changed`.
    pub fn off(&mut self, handle: RepresentationHandle, listener: ListenerID) -> bool {
        self.nodes
            .get_mut(handle.node)
            .and_then(SceneNode::as_representation_mut)
            .is_some_and(|rep| rep.events.remove(listener))
    }

    pub fn actor(&self, handle: RepresentationHandle) -> Option<ObjectID> {
        self.live_representation(handle.node)?.actor()
    }

    pub fn mapper(&self, handle: RepresentationHandle) -> Option<ObjectID> {
        self.live_representation(handle.node)?.mapper()
    }

    /// Effective color range, [`DataRange::EMPTY`] for stale handles or before data arrives.
    pub fn data_range(&self, handle: RepresentationHandle) -> DataRange {
        self.live_representation(handle.node)
            .map(RepresentationState::data_range)
            .unwrap_or(DataRange::EMPTY)
    }

    pub fn is_data_available(&self, handle: RepresentationHandle) -> bool {
        self.live_representation(handle.node)
            .is_some_and(RepresentationState::is_data_available)
    }

    /// Feeds `data` straight into the representation's mapper.
    pub fn set_input_data(&mut self, handle: DownstreamHandle, data: ObjectID) -> bool {
        let Some(mapper) = self.live_mapper(handle) else {
            return false;
        };
        let changed = self.bridge.set_input_data(mapper, data);
        self.track_downstream(handle, changed);
        changed
    }

    /// Connects a producer's output to the representation's mapper.
    pub fn set_input_connection(&mut self, handle: DownstreamHandle, source: ObjectID) -> bool {
        let Some(mapper) = self.live_mapper(handle) else {
            return false;
        };
        let changed = self.bridge.set_input_connection(mapper, source);
        self.track_downstream(handle, changed);
        changed
    }

    fn live_mapper(&self, handle: DownstreamHandle) -> Option<ObjectID> {
        let mapper = self.live_representation(handle.node)?.mapper()?;
        if mapper != handle.mapper {
            log::debug!(
                "downstream handle of {} refers to replaced mapper {}",
                handle.node,
                handle.mapper
            );
            return None;
        }
        Some(mapper)
    }

    fn track_downstream(&mut self, handle: DownstreamHandle, changed: bool) {
        let scope = self
            .live_representation(handle.node)
            .and_then(RepresentationState::scope);
        self.track_scope(scope, changed);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::{ColorDataRange, RepresentationProps};
    use prism_bridge::{DataRange, NativeBridge, ObjectKind};
    use prism_ids::ObjectID;
    use prism_variant::PropertyBag;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<Option<ObjectID>>>>, impl FnMut(Option<ObjectID>)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |data| sink.borrow_mut().push(data))
    }

    #[test]
    fn actor_is_hidden_until_data_arrives() {
        let mut scene = scene();
        scene.sync(&bare_volume_tree(RepresentationProps::default()));
        assert_eq!(visibility_of(&scene), Some(false));

        let handle = scene
            .representation_handle(volume_node(&scene))
            .expect("representation handle");
        let (available, on_available) = recorder();
        let (changed, on_changed) = recorder();
        scene.on_data_available(handle, on_available);
        scene.on_data_changed(handle, on_changed);

        let array = scene.bridge_mut().create_array(vec![1.0, 2.0], 1);
        let report = scene.sync(&volume_tree(RepresentationProps::default(), image(Some(array))));
        assert_eq!(visibility_of(&scene), Some(true));
        assert_eq!(report.renders, 1);
        assert_eq!(available.borrow().len(), 1);
        assert_eq!(changed.borrow().len(), 1);
        let data = scene.bridge().input_data(mapper_of(&scene));
        assert!(data.is_some());
        assert_eq!(available.borrow()[0], data);

        scene.sync(&volume_tree(RepresentationProps::default(), image(Some(array))));
        assert_eq!(available.borrow().len(), 1);
        assert_eq!(changed.borrow().len(), 1);
    }

    #[test]
    fn declared_hidden_actor_stays_hidden_with_data() {
        let mut scene = scene();
        let array = scene.bridge_mut().create_array(vec![1.0, 2.0], 1);
        scene.sync(&volume_tree(
            RepresentationProps {
                actor: PropertyBag::new().with("visibility", false),
                ..Default::default()
            },
            image(Some(array)),
        ));
        let handle = scene
            .representation_handle(volume_node(&scene))
            .expect("representation handle");
        assert!(scene.is_data_available(handle));
        assert_eq!(visibility_of(&scene), Some(false));
    }

    #[test]
    fn available_event_fires_again_only_after_data_is_lost() {
        let mut scene = scene();
        scene.sync(&bare_volume_tree(RepresentationProps::default()));
        let handle = scene
            .representation_handle(volume_node(&scene))
            .expect("representation handle");
        let (available, on_available) = recorder();
        scene.on_data_available(handle, on_available);

        scene.data_available(handle, true);
        scene.data_available(handle, true);
        assert_eq!(available.borrow().len(), 1);

        scene.data_available(handle, false);
        assert_eq!(visibility_of(&scene), Some(false));
        scene.data_available(handle, true);
        assert_eq!(available.borrow().len(), 2);
    }

    #[test]
    fn swapping_scalars_updates_range_exactly_once() {
        let mut scene = scene();
        let a = scene.bridge_mut().create_array(vec![0.0, 4.0, 10.0], 1);
        let b = scene.bridge_mut().create_array(vec![-5.0, 20.0], 1);

        scene.sync(&volume_tree(RepresentationProps::default(), image(Some(a))));
        let handle = scene
            .representation_handle(volume_node(&scene))
            .expect("representation handle");
        assert_eq!(scene.data_range(handle), DataRange::new(0.0, 10.0));
        let recomputations = |scene: &crate::Scene<_>| {
            scene
                .node(volume_node(scene))
                .and_then(|n| n.as_representation())
                .map(|rep| rep.range_recomputations())
        };
        assert_eq!(recomputations(&scene), Some(1));

        scene.sync(&volume_tree(RepresentationProps::default(), image(Some(b))));
        assert_eq!(scene.data_range(handle), DataRange::new(-5.0, 20.0));
        assert_eq!(recomputations(&scene), Some(2));

        scene.sync(&volume_tree(RepresentationProps::default(), image(Some(b))));
        scene.sync(&volume_tree(RepresentationProps::default(), image(Some(b))));
        assert_eq!(recomputations(&scene), Some(2));

        let lut = scene
            .node(volume_node(&scene))
            .and_then(|n| n.as_representation())
            .and_then(|rep| rep.lookup_table())
            .expect("lookup table");
        assert_eq!(
            scene.bridge().get_property(lut, "mappingRange"),
            Some(DataRange::new(-5.0, 20.0).to_variant())
        );
    }

    #[test]
    fn fixed_range_overrides_data() {
        let mut scene = scene();
        let array = scene.bridge_mut().create_array(vec![0.0, 100.0], 1);
        let fixed = DataRange::new(10.0, 20.0);
        scene.sync(&volume_tree(
            RepresentationProps {
                color_data_range: ColorDataRange::Fixed(fixed),
                ..Default::default()
            },
            image(Some(array)),
        ));
        let handle = scene
            .representation_handle(volume_node(&scene))
            .expect("representation handle");
        assert_eq!(scene.data_range(handle), fixed);
        assert_eq!(scene.bridge().subscriptions_on(array), 0);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let mut scene = scene();
        scene.sync(&bare_volume_tree(RepresentationProps::default()));
        let handle = scene
            .representation_handle(volume_node(&scene))
            .expect("representation handle");
        let (changed, on_changed) = recorder();
        let id = scene
            .on_data_changed(handle, on_changed)
            .expect("live representation");

        assert!(scene.off(handle, id));
        assert!(!scene.off(handle, id));
        scene.data_changed(handle);
        assert!(changed.borrow().is_empty());
    }

    #[test]
    fn stale_handles_are_inert() {
        let mut scene = scene();
        scene.sync(&bare_volume_tree(RepresentationProps::default()));
        let node = volume_node(&scene);
        let handle = scene.representation_handle(node).expect("representation handle");
        let downstream = scene.downstream_handle(node).expect("downstream handle");
        scene.clear();

        assert!(!scene.data_available(handle, true));
        assert!(!scene.data_changed(handle));
        assert_eq!(scene.on_data_changed(handle, |_| {}), None);
        assert_eq!(scene.actor(handle), None);
        assert_eq!(scene.mapper(handle), None);
        assert!(scene.data_range(handle).is_empty());

        let data = scene.bridge_mut().create_external(ObjectKind::ImageData);
        assert!(!scene.set_input_data(downstream, data));
        assert_eq!(scene.pump_events(), 0);
    }

    #[test]
    fn downstream_handle_feeds_the_mapper() {
        let mut scene = scene();
        scene.sync(&bare_volume_tree(RepresentationProps::default()));
        let node = volume_node(&scene);
        let downstream = scene.downstream_handle(node).expect("downstream handle");
        let handle = scene.representation_handle(node).expect("representation handle");
        assert_eq!(scene.mapper(handle), Some(downstream.mapper()));
        assert_eq!(scene.actor(handle), Some(actor_of(&scene)));

        let data = scene.bridge_mut().create_external(ObjectKind::ImageData);
        assert!(scene.set_input_data(downstream, data));
        assert!(!scene.set_input_data(downstream, data));
        assert_eq!(scene.bridge().input_data(downstream.mapper()), Some(data));
        assert_eq!(scene.pump_events(), 1);

        let source = scene.bridge_mut().create_external(ObjectKind::ImageData);
        assert!(scene.set_input_connection(downstream, source));
        assert_eq!(scene.bridge().input_data(downstream.mapper()), Some(source));
    }
}
