//! Input data structures for the topology map.
//!
//! Shapes mirror the CMDB wire format: camelCase field names, numeric ids,
//! and label-source fields carried as serialized JSON lists.

use std::collections::HashMap;

use log::warn;
use serde::Deserialize;
use serde_json::Value;

/// Summary fields a node's display label is derived from.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CiSummary {
	/// Item code, the lowest-precedence label source.
	pub ci_code: Option<String>,
	/// Serialized JSON list of primary-key values.
	pub ci_primary_key: Option<String>,
	/// Serialized JSON list of label values, the highest-precedence source.
	pub ci_label: Option<String>,
}

/// A configuration item, rendered as one node.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiNode {
	/// Unique, stable id. Keys the node's visual as `N_<id>`.
	pub id: i64,
	/// Reference into the class-info map.
	pub class_id: i64,
	/// Raw label-source payload.
	#[serde(default)]
	pub ci: CiSummary,
	/// Raw attribute values, keyed by standard or display name.
	#[serde(default)]
	pub attrs: HashMap<String, Value>,
}

/// A relationship, rendered as one directed link.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiLink {
	/// Unique, stable id. Keys the link's visual as `L_<id>`.
	pub id: i64,
	/// Source node id. Must exist in the node list.
	pub source: i64,
	/// Target node id. Must exist in the node list.
	pub target: i64,
	/// Relationship-type text drawn at the path midpoint.
	#[serde(default)]
	pub rlt_name: Option<String>,
}

/// Class display metadata.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CiClass {
	/// Icon reference drawn as the node glyph.
	pub icon: String,
	/// Class display name.
	pub name: Option<String>,
}

/// One attribute definition from a class schema.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttrDef {
	/// Display name; also the key of the resolved attribute object.
	pub pro_name: String,
	/// Standard name, looked up first when resolving values.
	#[serde(default)]
	pub pro_std_name: Option<String>,
}

/// Class metadata entry: display info plus the ordered attribute schema.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassInfo {
	/// Display metadata, attached to nodes on click.
	pub ci_class: CiClass,
	/// Ordered attribute definitions.
	pub attr_defs: Vec<AttrDef>,
}

/// Map from class id to class metadata. Owned by the caller; the engine
/// only reads it.
pub type ClassInfoMap = HashMap<i64, ClassInfo>;

/// Complete topology document: nodes, links, and class metadata.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopologyData {
	/// All nodes.
	pub nodes: Vec<CiNode>,
	/// All links.
	pub links: Vec<CiLink>,
	/// Class metadata keyed by class id.
	pub class_infos: ClassInfoMap,
}

/// Designates nodes that receive a start or end marker.
#[derive(Clone, Debug, Default)]
pub struct TipConfig {
	/// Node id marked as the trace start.
	pub source_id: Option<i64>,
	/// Node id marked as the trace end.
	pub target_id: Option<i64>,
	/// Class id of the start node, when the host tracks it.
	pub source_class_id: Option<i64>,
	/// Class id of the end node, when the host tracks it.
	pub target_class_id: Option<i64>,
}

impl CiNode {
	/// Derive the display label: the code, overridden by the primary-key
	/// list, overridden by the label list. The list fields are serialized
	/// JSON and only count when they hold at least one non-empty entry; a
	/// list that fails to decode keeps the previous winner.
	pub fn display_label(&self) -> String {
		let mut name = self.ci.ci_code.clone().unwrap_or_default();
		if let Some(values) = decode_list(self.ci.ci_primary_key.as_deref(), self.id) {
			name = values.join(",");
		}
		if let Some(values) = decode_list(self.ci.ci_label.as_deref(), self.id) {
			name = values.join(",");
		}
		name
	}
}

fn decode_list(raw: Option<&str>, id: i64) -> Option<Vec<String>> {
	let raw = raw?;
	match serde_json::from_str::<Vec<String>>(raw) {
		Ok(values) if values.iter().any(|v| !v.is_empty()) => Some(values),
		Ok(_) => None,
		Err(e) => {
			warn!("topology-map: node {id}: undecodable label list {raw:?}: {e}");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(code: Option<&str>, pk: Option<&str>, label: Option<&str>) -> CiNode {
		CiNode {
			id: 1,
			class_id: 1,
			ci: CiSummary {
				ci_code: code.map(String::from),
				ci_primary_key: pk.map(String::from),
				ci_label: label.map(String::from),
			},
			attrs: HashMap::new(),
		}
	}

	#[test]
	fn code_alone_wins() {
		assert_eq!(node(Some("X"), None, None).display_label(), "X");
	}

	#[test]
	fn label_overrides_primary_key_overrides_code() {
		let n = node(Some("X"), Some(r#"["pk1","pk2"]"#), Some(r#"["a","b"]"#));
		assert_eq!(n.display_label(), "a,b");
	}

	#[test]
	fn primary_key_overrides_code() {
		let n = node(Some("X"), Some(r#"["pk1"]"#), None);
		assert_eq!(n.display_label(), "pk1");
	}

	#[test]
	fn empty_list_keeps_previous_winner() {
		let n = node(Some("X"), Some("[]"), Some(r#"["a","b"]"#));
		assert_eq!(n.display_label(), "a,b");
		let n = node(Some("X"), Some(r#"[""]"#), Some("[]"));
		assert_eq!(n.display_label(), "X");
	}

	#[test]
	fn undecodable_list_keeps_previous_winner() {
		let n = node(Some("X"), Some(r#"["pk1"]"#), Some("not json"));
		assert_eq!(n.display_label(), "pk1");
	}

	#[test]
	fn no_sources_yields_empty_label() {
		assert_eq!(node(None, None, None).display_label(), "");
	}

	#[test]
	fn wire_format_round_trips() {
		let data: TopologyData = serde_json::from_str(
			r#"{
				"nodes": [{"id": 1, "classId": 7, "ci": {"ciCode": "X"}, "attrs": {"name": "db01"}}],
				"links": [{"id": 10, "source": 1, "target": 1, "rltName": "runs_on"}],
				"classInfos": {"7": {"ciClass": {"icon": "host.svg"}, "attrDefs": [{"proName": "name"}]}}
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].class_id, 7);
		assert_eq!(data.links[0].rlt_name.as_deref(), Some("runs_on"));
		assert_eq!(data.class_infos[&7].ci_class.icon, "host.svg");
	}
}
