use crate::context::{RepresentationHandle, SyncContext};
use crate::desc::ImageDataProps;
use crate::differ::PropertyState;
use crate::registry::ObjectSlot;
use prism_bridge::{NativeBridge, ObjectKind};
use prism_ids::ObjectID;

/// What an image-data pass must report to its representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSignal {
    Unchanged,
    /// The image was (re)connected to the representation's mapper.
    Available(RepresentationHandle),
    /// Same connection, different content.
    Changed(RepresentationHandle),
}

pub struct ImageDataState {
    data: ObjectSlot,
    props: PropertyState,
    bound_scalars: Option<Option<ObjectID>>,
    fed: Option<(ObjectID, ObjectID)>,
}

impl ImageDataState {
    pub fn new() -> Self {
        Self {
            data: ObjectSlot::new(ObjectKind::ImageData),
            props: PropertyState::new(),
            bound_scalars: None,
            fed: None,
        }
    }

    #[inline]
    pub fn data(&self) -> Option<ObjectID> {
        self.data.peek()
    }

    pub(crate) fn sync<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        props: &ImageDataProps,
        ctx: &SyncContext,
    ) -> (bool, DataSignal) {
        let data = self.data.get(bridge);
        let mut changed = self.props.apply(bridge, data, &props.data);
        if self.bound_scalars != Some(props.scalars) {
            changed |= bridge.set_scalars(data, props.scalars);
            self.bound_scalars = Some(props.scalars);
        }

        let (Some(downstream), Some(rep)) = (ctx.downstream, ctx.representation) else {
            if self.fed.take().is_some() || changed {
                log::debug!("image data {data} has no representation to feed");
            }
            return (changed, DataSignal::Unchanged);
        };

        let target = (downstream.mapper, data);
        if self.fed != Some(target) {
            bridge.set_input_data(downstream.mapper, data);
            self.fed = Some(target);
            return (true, DataSignal::Available(rep));
        }
        if changed {
            (true, DataSignal::Changed(rep))
        } else {
            (false, DataSignal::Unchanged)
        }
    }

    pub(crate) fn release<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) {
        self.fed = None;
        self.data.release(bridge);
    }
}

impl Default for ImageDataState {
    fn default() -> Self {
        Self::new()
    }
}
