use super::{PassReport, Scene};
use crate::context::SyncContext;
use crate::desc::{NodeDesc, NodeSpec};
use crate::nodes::{DataSignal, NodeData, NodeKind, SceneNode};
use ahash::{AHashMap, AHashSet};
use prism_bridge::NativeBridge;
use prism_ids::{NodeID, NodeKey};

impl<B: NativeBridge> Scene<B> {
    /// Matches `descs` against the previous children of `parent` by `(key, kind)`.
    ///
    /// Matched nodes are updated in place, unmatched descriptions create nodes and unmatched
    /// previous children are torn down. Returns the new child list in description order.
    pub(super) fn reconcile_children(
        &mut self,
        parent: NodeID,
        previous: &[NodeID],
        descs: &[NodeDesc],
        ctx: SyncContext,
        report: &mut PassReport,
    ) -> Vec<NodeID> {
        let mut reusable: AHashMap<(NodeKey, NodeKind), NodeID> = AHashMap::default();
        for &id in previous {
            if let Some(node) = self.nodes.get(id) {
                reusable.entry((node.key, node.kind())).or_insert(id);
            }
        }

        let mut next = Vec::with_capacity(descs.len());
        let mut seen: AHashSet<(NodeKey, NodeKind)> = AHashSet::default();
        for desc in descs {
            let identity = (desc.key, desc.spec.kind());
            if !seen.insert(identity) {
                log::warn!(
                    "duplicate {:?} sibling {:?} under {parent}; ignoring the repeat",
                    identity.1,
                    desc.key
                );
                continue;
            }

            let id = match reusable.remove(&identity) {
                Some(id) => id,
                None => {
                    let node = SceneNode::new(desc.key, parent, NodeData::for_kind(identity.1));
                    let id = self.nodes.insert(node);
                    report.created += 1;
                    log::debug!("created {:?} {id}", identity.1);
                    id
                }
            };
            self.reconcile_node(id, desc, ctx, report);
            next.push(id);
        }

        let kept: AHashSet<NodeID> = next.iter().copied().collect();
        for &id in previous {
            if !kept.contains(&id) {
                self.destroy_subtree(id, report);
            }
        }
        next
    }

    /// Finishes `id`'s own objects, then reconciles its children with the handles it publishes.
    fn reconcile_node(
        &mut self,
        id: NodeID,
        desc: &NodeDesc,
        ctx: SyncContext,
        report: &mut PassReport,
    ) {
        let child_ctx = match &desc.spec {
            NodeSpec::View(props) => {
                let Some(NodeData::View(view)) = self.nodes.data_mut(id) else {
                    return;
                };
                let changed = view.sync(&mut self.bridge, props);
                view.dirty.track(changed);
                ctx.with_view(view.handle(id))
            }
            NodeSpec::Renderer(props) => {
                let Some(NodeData::Renderer(renderer)) = self.nodes.data_mut(id) else {
                    return;
                };
                let changed = renderer.sync(&mut self.bridge, props, ctx.view);
                let handle = renderer.handle(id);
                self.track_scope(ctx.scope(), changed);
                ctx.with_renderer(handle)
            }
            NodeSpec::VolumeRepresentation(props) | NodeSpec::GeometryRepresentation(props) => {
                let Some(NodeData::Representation(rep)) = self.nodes.data_mut(id) else {
                    return;
                };
                let changed = rep.sync(&mut self.bridge, id, props, &ctx, &self.config);
                let (representation, downstream) = rep.handles(id);
                self.track_scope(ctx.scope(), changed);
                ctx.with_representation(representation, downstream)
            }
            NodeSpec::ImageData(props) => {
                let Some(NodeData::ImageData(image)) = self.nodes.data_mut(id) else {
                    return;
                };
                let (changed, signal) = image.sync(&mut self.bridge, props, &ctx);
                self.track_scope(ctx.scope(), changed);
                match signal {
                    DataSignal::Available(rep) => {
                        self.data_available(rep, true);
                    }
                    DataSignal::Changed(rep) => {
                        self.data_changed(rep);
                    }
                    DataSignal::Unchanged => {}
                }
                ctx
            }
        };
        self.reconcile_subtree(id, &desc.children, child_ctx, report);
    }

    fn reconcile_subtree(
        &mut self,
        id: NodeID,
        descs: &[NodeDesc],
        ctx: SyncContext,
        report: &mut PassReport,
    ) {
        let previous = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        if previous.is_empty() && descs.is_empty() {
            return;
        }
        let next = self.reconcile_children(id, &previous, descs, ctx, report);
        if let Some(node) = self.nodes.get_mut(id) {
            node.children = next;
        }
    }

    /// Post-order teardown: children release before their parent.
    pub(super) fn destroy_subtree(&mut self, id: NodeID, report: &mut PassReport) {
        let children = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.destroy_subtree(child, report);
        }

        let scope = self
            .nodes
            .get(id)
            .and_then(|node| self.enclosing_view(node.parent));
        let Some(mut node) = self.nodes.remove(id) else {
            return;
        };
        match &mut node.data {
            NodeData::View(view) => view.release(&mut self.bridge),
            NodeData::Renderer(renderer) => renderer.release(&mut self.bridge),
            NodeData::Representation(rep) => rep.release(&mut self.bridge),
            NodeData::ImageData(image) => image.release(&mut self.bridge),
        }
        self.track_scope(scope, true);
        report.destroyed += 1;
        log::debug!("destroyed {:?} {id}", node.kind());
    }
}
