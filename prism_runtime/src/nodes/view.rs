use crate::context::{RendererHandle, ViewHandle};
use crate::desc::{RendererProps, ViewProps};
use crate::differ::PropertyState;
use crate::dirty::DirtyAccumulator;
use crate::registry::ObjectSlot;
use prism_bridge::{NativeBridge, ObjectKind};
use prism_ids::{NodeID, ObjectID};

/// Root of a render scope: owns the window and the pass's dirty flag for it.
pub struct ViewState {
    window: ObjectSlot,
    props: PropertyState,
    pub(crate) dirty: DirtyAccumulator,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            window: ObjectSlot::new(ObjectKind::RenderWindow),
            props: PropertyState::new(),
            dirty: DirtyAccumulator::new(),
        }
    }

    #[inline]
    pub fn window(&self) -> Option<ObjectID> {
        self.window.peek()
    }

    pub(crate) fn sync<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B, props: &ViewProps) -> bool {
        let window = self.window.get(bridge);
        self.props.apply(bridge, window, &props.window)
    }

    pub(crate) fn handle(&self, node: NodeID) -> Option<ViewHandle> {
        Some(ViewHandle {
            node,
            window: self.window.peek()?,
        })
    }

    pub(crate) fn release<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) {
        self.window.release(bridge);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RendererState {
    renderer: ObjectSlot,
    props: PropertyState,
    window: Option<ObjectID>,
}

impl RendererState {
    pub fn new() -> Self {
        Self {
            renderer: ObjectSlot::new(ObjectKind::Renderer),
            props: PropertyState::new(),
            window: None,
        }
    }

    #[inline]
    pub fn renderer(&self) -> Option<ObjectID> {
        self.renderer.peek()
    }

    pub(crate) fn sync<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        props: &RendererProps,
        view: Option<ViewHandle>,
    ) -> bool {
        let renderer = self.renderer.get(bridge);
        let mut changed = false;
        let window = view.map(|v| v.window);
        if self.window != window {
            if let Some(old) = self.window {
                changed |= bridge.remove_renderer(old, renderer);
            }
            match window {
                Some(new) => changed |= bridge.add_renderer(new, renderer),
                None => log::warn!("renderer {renderer} has no enclosing view"),
            }
            self.window = window;
        }
        changed |= self.props.apply(bridge, renderer, &props.renderer);
        changed
    }

    pub(crate) fn handle(&self, node: NodeID) -> Option<RendererHandle> {
        Some(RendererHandle {
            node,
            renderer: self.renderer.peek()?,
        })
    }

    pub(crate) fn release<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) {
        if let (Some(window), Some(renderer)) = (self.window.take(), self.renderer.peek()) {
            bridge.remove_renderer(window, renderer);
        }
        self.renderer.release(bridge);
    }
}

impl Default for RendererState {
    fn default() -> Self {
        Self::new()
    }
}
