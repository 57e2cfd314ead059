//! Node/link arena backing the simulation and the scene.
//!
//! Links store node indices rather than node references, so the solver,
//! the scene, and read-only inspection can all walk the graph without
//! shared ownership or reference cycles.

use std::collections::HashMap;

use super::error::{Result, TopologyError};
use super::types::{CiLink, CiNode, ClassInfoMap};

/// One simulated node: input payload plus solver state.
#[derive(Clone, Debug)]
pub struct NodeState {
	/// The configuration item this node represents.
	pub data: CiNode,
	/// Current x position, rewritten every tick.
	pub x: f64,
	/// Current y position, rewritten every tick.
	pub y: f64,
	/// Current x velocity.
	pub vx: f64,
	/// Current y velocity.
	pub vy: f64,
	/// Pinned x position; the solver holds the node here on that axis.
	pub fx: Option<f64>,
	/// Pinned y position.
	pub fy: Option<f64>,
}

impl NodeState {
	fn new(data: CiNode) -> Self {
		Self {
			data,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}
}

/// One link with both endpoints resolved to arena indices.
#[derive(Clone, Debug)]
pub struct LinkState {
	/// The relationship this link represents.
	pub data: CiLink,
	/// Arena index of the source node.
	pub source: usize,
	/// Arena index of the target node.
	pub target: usize,
}

/// The resolved graph arena.
#[derive(Clone, Debug, Default)]
pub struct Topology {
	/// All nodes, in input order.
	pub nodes: Vec<NodeState>,
	/// All links, in input order.
	pub links: Vec<LinkState>,
	index_by_node_id: HashMap<i64, usize>,
	index_by_link_id: HashMap<i64, usize>,
	degree: Vec<usize>,
}

impl Topology {
	/// Build the arena, validating every reference up front: each link
	/// endpoint must name a known node, and each node's class must have a
	/// class-info entry.
	pub fn build(
		nodes: Vec<CiNode>,
		links: Vec<CiLink>,
		class_infos: &ClassInfoMap,
	) -> Result<Self> {
		let mut index_by_node_id = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if !class_infos.contains_key(&node.class_id) {
				return Err(TopologyError::MissingClassInfo {
					node_id: node.id,
					class_id: node.class_id,
				});
			}
			index_by_node_id.insert(node.id, i);
		}

		let mut index_by_link_id = HashMap::with_capacity(links.len());
		let mut resolved = Vec::with_capacity(links.len());
		let mut degree = vec![0usize; nodes.len()];
		for (i, link) in links.into_iter().enumerate() {
			let endpoint = |id: i64| {
				index_by_node_id
					.get(&id)
					.copied()
					.ok_or(TopologyError::UnknownLinkEndpoint {
						link_id: link.id,
						endpoint_id: id,
					})
			};
			let source = endpoint(link.source)?;
			let target = endpoint(link.target)?;
			degree[source] += 1;
			degree[target] += 1;
			index_by_link_id.insert(link.id, i);
			resolved.push(LinkState {
				data: link,
				source,
				target,
			});
		}

		Ok(Self {
			nodes: nodes.into_iter().map(NodeState::new).collect(),
			links: resolved,
			index_by_node_id,
			index_by_link_id,
			degree,
		})
	}

	/// Arena index of the node with the given ci id.
	pub fn node_index(&self, ci_id: i64) -> Option<usize> {
		self.index_by_node_id.get(&ci_id).copied()
	}

	/// Arena index of the link with the given rlt id.
	pub fn link_index(&self, rlt_id: i64) -> Option<usize> {
		self.index_by_link_id.get(&rlt_id).copied()
	}

	/// Number of links touching the node.
	pub fn degree(&self, idx: usize) -> usize {
		self.degree[idx]
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::super::types::{CiSummary, ClassInfo};
	use super::*;

	fn ci(id: i64, class_id: i64) -> CiNode {
		CiNode {
			id,
			class_id,
			ci: CiSummary::default(),
			attrs: HashMap::new(),
		}
	}

	fn rlt(id: i64, source: i64, target: i64) -> CiLink {
		CiLink {
			id,
			source,
			target,
			rlt_name: None,
		}
	}

	fn classes(ids: &[i64]) -> ClassInfoMap {
		ids.iter().map(|&id| (id, ClassInfo::default())).collect()
	}

	#[test]
	fn builds_indices_and_degrees() {
		let topo = Topology::build(
			vec![ci(1, 7), ci(2, 7), ci(3, 7)],
			vec![rlt(10, 1, 2), rlt(11, 2, 3)],
			&classes(&[7]),
		)
		.unwrap();
		assert_eq!(topo.node_index(2), Some(1));
		assert_eq!(topo.link_index(11), Some(1));
		assert_eq!(topo.degree(0), 1);
		assert_eq!(topo.degree(1), 2);
		assert_eq!(topo.links[0].source, 0);
		assert_eq!(topo.links[0].target, 1);
	}

	#[test]
	fn rejects_dangling_link_endpoint() {
		let err = Topology::build(vec![ci(1, 7)], vec![rlt(10, 1, 99)], &classes(&[7]))
			.unwrap_err();
		assert!(matches!(
			err,
			TopologyError::UnknownLinkEndpoint {
				link_id: 10,
				endpoint_id: 99
			}
		));
	}

	#[test]
	fn rejects_missing_class_info() {
		let err = Topology::build(vec![ci(1, 8)], vec![], &classes(&[7])).unwrap_err();
		assert!(matches!(
			err,
			TopologyError::MissingClassInfo {
				node_id: 1,
				class_id: 8
			}
		));
	}

	#[test]
	fn empty_graph_is_valid() {
		let topo = Topology::build(vec![], vec![], &HashMap::new()).unwrap();
		assert!(topo.nodes.is_empty() && topo.links.is_empty());
	}
}
