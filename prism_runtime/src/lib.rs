mod config;
mod context;
mod data_range;
mod desc;
mod differ;
mod dirty;
mod events;
mod modified;
mod node_arena;
mod nodes;
mod registry;
mod scene;
mod scheduler;

pub use config::SyncConfig;
pub use context::{
    DownstreamHandle, RendererHandle, RepresentationHandle, SyncContext, ViewHandle,
};
pub use data_range::{ColorDataRange, DataRangeObserver};
pub use desc::{
    ImageDataProps, NodeDesc, NodeSpec, RendererProps, RepresentationProps, ViewProps,
};
pub use differ::{PropertyState, TransferSlots, apply_bag};
pub use dirty::DirtyAccumulator;
pub use events::{DataEvent, DataEventHub, DataListener};
pub use modified::ModifiedSubscriptions;
pub use node_arena::NodeArena;
pub use nodes::{
    ImageDataState, NodeData, NodeKind, RendererState, RepresentationFlavor, RepresentationState,
    SceneNode, ViewState,
};
pub use registry::ObjectSlot;
pub use scene::{PassReport, Scene};
pub use scheduler::RenderScheduler;
