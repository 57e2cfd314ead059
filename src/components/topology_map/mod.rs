//! Interactive force-directed topology map.
//!
//! Positions configuration items with a physical layout simulation and
//! keeps the scene responsive to the user:
//! - Weak spring links, range-capped charge repulsion, and a barycenter
//!   pull keep the layout alive without ever cooling down
//! - Left-drag pins a node; a press released with zero net displacement
//!   is a click and delivers the node's resolved attributes
//! - Hovering previews the 1-hop neighborhood by dimming everything else
//! - Pan (right button), wheel zoom, and programmatic zoom/selection
//!
//! The engine core ([`TopologyMap`]) is headless and owns all state;
//! [`TopologyMapCanvas`] binds it to an HTML canvas element.

mod component;
mod config;
mod engine;
mod error;
mod graph;
mod interaction;
mod render;
mod scene;
mod selection;
mod simulation;
mod transform;
mod types;

pub use component::TopologyMapCanvas;
pub use config::MapConfig;
pub use engine::{NullEvents, ResolvedNode, TopologyEvents, TopologyMap};
pub use error::{Result, TopologyError};
pub use graph::{LinkState, NodeState, Topology};
pub use interaction::{PointerButton, PointerEvent};
pub use scene::{HaloQuad, LinkPath, LinkVisual, NodeVisual, Scene, TipKind};
pub use selection::{Preview, Selection};
pub use simulation::{Simulation, SimulationParams};
pub use transform::ViewTransform;
pub use types::{
	AttrDef, CiClass, CiLink, CiNode, CiSummary, ClassInfo, ClassInfoMap, TipConfig, TopologyData,
};
