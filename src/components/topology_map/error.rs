//! Error types for scene construction and programmatic selection.

/// Result alias for topology-map operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors surfaced by the engine. Scene construction fails fast instead of
/// carrying dangling references into the solver or the renderer.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
	/// A link references a node id absent from the node list.
	#[error("link {link_id}: endpoint {endpoint_id} is not a known node")]
	UnknownLinkEndpoint {
		/// Offending link id.
		link_id: i64,
		/// The endpoint id that has no matching node.
		endpoint_id: i64,
	},

	/// A node references a class id absent from the class-info map.
	#[error("node {node_id}: class {class_id} has no class-info entry")]
	MissingClassInfo {
		/// Offending node id.
		node_id: i64,
		/// The class id that has no metadata.
		class_id: i64,
	},

	/// Programmatic selection of a node id not in the current scene.
	#[error("no node with ci id {0} in the current scene")]
	UnknownNode(i64),

	/// Programmatic selection of a link id not in the current scene.
	#[error("no link with rlt id {0} in the current scene")]
	UnknownLink(i64),
}
