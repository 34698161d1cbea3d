use super::Scene;
use crate::nodes::{SceneNode, Watch};
use prism_bridge::{BridgeEvent, NativeBridge};

impl<B: NativeBridge> Scene<B> {
    /// Routes queued modified notifications to the representation that subscribed.
    ///
    /// Notifications for removed nodes, or for subscriptions a node has since dropped, are
    /// ignored. Returns how many were acted on.
    pub(super) fn drain_bridge_events(&mut self) -> usize {
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        self.bridge.drain_events(&mut events);

        let mut handled = 0;
        for event in events.drain(..) {
            let BridgeEvent::Modified {
                subscription,
                owner,
                object,
            } = event;
            let target = self
                .nodes
                .get(owner)
                .and_then(SceneNode::as_representation)
                .and_then(|rep| {
                    let watch = rep.watch_kind(subscription)?;
                    Some((watch, rep.handles(owner).0, rep.scope()))
                });
            match target {
                Some((Watch::TransferFunction, _, scope)) => {
                    log::trace!("transfer function {object} modified; {owner} needs a redraw");
                    self.track_scope(scope, true);
                    handled += 1;
                }
                Some((Watch::ScalarArray, Some(handle), _)) => {
                    log::trace!("scalars {object} modified in place under {owner}");
                    self.data_changed(handle);
                    handled += 1;
                }
                _ => log::trace!("ignoring notification {subscription} on {object}"),
            }
        }
        self.events = events;
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::{NodeDesc, RendererProps, RepresentationProps, ViewProps};
    use prism_bridge::{DataRange, ObjectKind};
    use prism_variant::Variant;

    fn edit(scene: &mut crate::Scene<prism_headless::HeadlessBridge>, object: prism_ids::ObjectID) {
        scene
            .bridge_mut()
            .modify_external(object, "points", Variant::Array(vec![Variant::from(1.0f64)]));
    }

    #[test]
    fn external_function_edits_coalesce_into_one_render() {
        let mut scene = scene();
        let function = scene
            .bridge_mut()
            .create_external(ObjectKind::ColorTransferFunction);
        scene.sync(&volume_tree(
            RepresentationProps {
                color_transfer_functions: vec![Some(function)],
                ..Default::default()
            },
            image(None),
        ));
        scene.bridge_mut().reset_stats();

        edit(&mut scene, function);
        edit(&mut scene, function);
        assert_eq!(scene.pump_events(), 1);
        assert_eq!(scene.bridge().renders(), &[window_of(&scene)]);
        assert_eq!(scene.pump_events(), 0);
    }

    #[test]
    fn shared_function_subscribes_once() {
        let mut scene = scene();
        let function = scene
            .bridge_mut()
            .create_external(ObjectKind::ColorTransferFunction);
        scene.sync(&volume_tree(
            RepresentationProps {
                color_transfer_functions: vec![Some(function), Some(function)],
                ..Default::default()
            },
            image(None),
        ));
        assert_eq!(scene.bridge().subscriptions_on(function), 1);
    }

    #[test]
    fn removed_representation_no_longer_reacts() {
        let mut scene = scene();
        let function = scene.bridge_mut().create_external(ObjectKind::PiecewiseFunction);
        scene.sync(&volume_tree(
            RepresentationProps {
                scalar_opacity_functions: vec![Some(function)],
                ..Default::default()
            },
            image(None),
        ));
        scene.sync(&[NodeDesc::view("view", ViewProps::default())
            .with_child(NodeDesc::renderer("renderer", RendererProps::default()))]);
        assert_eq!(scene.bridge().subscriptions_on(function), 0);
        scene.bridge_mut().reset_stats();

        edit(&mut scene, function);
        assert_eq!(scene.pump_events(), 0);
        assert!(scene.bridge().renders().is_empty());
    }

    #[test]
    fn pending_notification_does_not_outlive_teardown() {
        let mut scene = scene();
        let function = scene
            .bridge_mut()
            .create_external(ObjectKind::ColorTransferFunction);
        scene.sync(&volume_tree(
            RepresentationProps {
                color_transfer_functions: vec![Some(function)],
                ..Default::default()
            },
            image(None),
        ));
        edit(&mut scene, function);
        let report = scene.clear();
        assert_eq!(report.renders, 0);
        assert_eq!(scene.pump_events(), 0);
    }

    #[test]
    fn replaced_function_is_unsubscribed() {
        let mut scene = scene();
        let old = scene
            .bridge_mut()
            .create_external(ObjectKind::ColorTransferFunction);
        let new = scene
            .bridge_mut()
            .create_external(ObjectKind::ColorTransferFunction);
        let tree = |function| {
            volume_tree(
                RepresentationProps {
                    color_transfer_functions: vec![Some(function)],
                    ..Default::default()
                },
                image(None),
            )
        };
        scene.sync(&tree(old));
        scene.sync(&tree(new));
        assert_eq!(scene.bridge().subscriptions_on(old), 0);
        assert_eq!(scene.bridge().subscriptions_on(new), 1);

        scene.bridge_mut().reset_stats();
        edit(&mut scene, old);
        assert_eq!(scene.pump_events(), 0);
    }

    #[test]
    fn in_place_scalar_edit_refreshes_range() {
        let mut scene = scene();
        let array = scene.bridge_mut().create_array(vec![0.0, 1.0], 1);
        scene.sync(&volume_tree(RepresentationProps::default(), image(Some(array))));
        let handle = scene
            .representation_handle(volume_node(&scene))
            .expect("representation handle");
        assert_eq!(scene.bridge().subscriptions_on(array), 1);
        scene.bridge_mut().reset_stats();

        scene.bridge_mut().replace_array_values(array, vec![-2.0, 8.0]);
        assert_eq!(scene.pump_events(), 1);
        assert_eq!(scene.data_range(handle), DataRange::new(-2.0, 8.0));
    }
}
