//! Integration tests driving the headless engine façade the way the
//! canvas adapter does: build a scene, tick it, and feed pointer events.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::json;
use topology_map::{
	AttrDef, CiClass, CiLink, CiNode, CiSummary, ClassInfo, ClassInfoMap, MapConfig, NullEvents,
	PointerButton, PointerEvent, Preview, ResolvedNode, Selection, TopologyError, TopologyEvents,
	TopologyMap,
};

#[derive(Clone, Debug, PartialEq)]
enum Recorded {
	Node(i64),
	Link(i64),
	Cleared,
}

#[derive(Default)]
struct Recorder {
	events: RefCell<Vec<Recorded>>,
	last_node: RefCell<Option<ResolvedNode>>,
}

impl Recorder {
	fn events(&self) -> Vec<Recorded> {
		self.events.borrow().clone()
	}
}

impl TopologyEvents for Recorder {
	fn on_node_click(&self, node: &ResolvedNode) {
		self.events.borrow_mut().push(Recorded::Node(node.id));
		*self.last_node.borrow_mut() = Some(node.clone());
	}

	fn on_link_click(&self, link: &CiLink) {
		self.events.borrow_mut().push(Recorded::Link(link.id));
	}

	fn on_selection_cleared(&self) {
		self.events.borrow_mut().push(Recorded::Cleared);
	}
}

fn node(id: i64) -> CiNode {
	CiNode {
		id,
		class_id: 7,
		ci: CiSummary {
			ci_code: Some(format!("CI-{id}")),
			ci_primary_key: None,
			ci_label: None,
		},
		attrs: HashMap::from([
			("std_name".to_string(), json!("DB01")),
			("ip".to_string(), json!("10.0.0.1")),
		]),
	}
}

fn link(id: i64, source: i64, target: i64) -> CiLink {
	CiLink {
		id,
		source,
		target,
		rlt_name: Some("runs_on".to_string()),
	}
}

fn classes() -> ClassInfoMap {
	HashMap::from([(
		7,
		ClassInfo {
			ci_class: CiClass {
				icon: "host.svg".to_string(),
				name: Some("Host".to_string()),
			},
			attr_defs: vec![
				AttrDef {
					pro_name: "name".to_string(),
					pro_std_name: Some("std_name".to_string()),
				},
				AttrDef {
					pro_name: "ip".to_string(),
					pro_std_name: None,
				},
			],
		},
	)])
}

fn engine() -> (TopologyMap, Rc<Recorder>) {
	let recorder = Rc::new(Recorder::default());
	let map = TopologyMap::new(MapConfig::default(), recorder.clone());
	(map, recorder)
}

fn started() -> (TopologyMap, Rc<Recorder>) {
	let (mut map, recorder) = engine();
	map.start(vec![node(1), node(2)], vec![link(10, 1, 2)], classes())
		.unwrap();
	// let the layout spread the nodes apart so hit tests are unambiguous
	for _ in 0..200 {
		map.tick();
	}
	(map, recorder)
}

fn node_center(map: &TopologyMap, idx: usize) -> (f64, f64) {
	let v = &map.scene().nodes[idx];
	(v.x, v.y)
}

#[test]
fn start_builds_stable_visual_ids() {
	let (map, _) = started();
	let scene = map.scene();
	assert_eq!(scene.nodes.len(), 2);
	assert_eq!(scene.links.len(), 1);
	assert_eq!(scene.nodes[0].id, "N_1");
	assert_eq!(scene.nodes[1].id, "N_2");
	assert_eq!(scene.links[0].id, "L_10");
}

#[test]
fn every_node_has_a_defined_position_after_ticks() {
	let (mut map, _) = started();
	for _ in 0..60 {
		map.tick();
	}
	for v in &map.scene().nodes {
		assert!(v.x.is_finite() && v.y.is_finite());
	}
	// path endpoints sit on the endpoint circles (target end offset for
	// the arrowhead)
	let scene = map.scene();
	let l = &scene.links[0];
	assert!(!l.degenerate);
	let (sx, sy) = (scene.nodes[0].x, scene.nodes[0].y);
	let (tx, ty) = (scene.nodes[1].x, scene.nodes[1].y);
	let d1 = ((l.path.x1 - sx).powi(2) + (l.path.y1 - sy).powi(2)).sqrt();
	let d2 = ((l.path.x2 - tx).powi(2) + (l.path.y2 - ty).powi(2)).sqrt();
	assert!((d1 - scene.nodes[0].r).abs() < 1e-6);
	assert!((d2 - (scene.nodes[1].r + 4.0)).abs() < 1e-6);
}

#[test]
fn programmatic_node_selection_acts_like_a_click() {
	let (mut map, recorder) = started();
	map.select_node_by_ci_id(1).unwrap();
	assert_eq!(recorder.events(), vec![Recorded::Node(1)]);
	assert!(map.scene().nodes[0].selected);
	assert_eq!(map.selection(), Selection::Node(0));

	let resolved = recorder.last_node.borrow().clone().unwrap();
	assert_eq!(resolved.ci_class.icon, "host.svg");
	// standard-name lookup wins; display-name lookup is the fallback
	assert_eq!(resolved.attrs["name"], json!("DB01"));
	assert_eq!(resolved.attrs["ip"], json!("10.0.0.1"));
}

#[test]
fn programmatic_selection_of_unknown_ids_fails() {
	let (mut map, _) = started();
	assert!(matches!(
		map.select_node_by_ci_id(99),
		Err(TopologyError::UnknownNode(99))
	));
	assert!(matches!(
		map.select_link_by_rlt_id(99),
		Err(TopologyError::UnknownLink(99))
	));
}

#[test]
fn click_delivers_resolved_attributes_and_pins() {
	let (mut map, recorder) = started();
	let (x, y) = node_center(&map, 0);
	map.handle_pointer(PointerEvent::Down {
		x,
		y,
		button: PointerButton::Left,
	});
	map.handle_pointer(PointerEvent::Up { x, y });
	assert_eq!(recorder.events(), vec![Recorded::Node(1)]);
	assert!(map.scene().nodes[0].selected);
	assert_eq!(map.topology().nodes[0].fx, Some(x));
	assert_eq!(map.topology().nodes[0].fy, Some(y));
}

#[test]
fn drag_pins_without_a_click_callback() {
	let (mut map, recorder) = started();
	let (x, y) = node_center(&map, 0);
	map.handle_pointer(PointerEvent::Down {
		x,
		y,
		button: PointerButton::Left,
	});
	map.handle_pointer(PointerEvent::Move { x: x + 30.0, y });
	map.handle_pointer(PointerEvent::Up { x: x + 30.0, y });
	assert_eq!(recorder.events(), vec![]);
	assert_eq!(map.selection(), Selection::Empty);
	assert_eq!(map.topology().nodes[0].fx, Some(x + 30.0));
	assert_eq!(map.topology().nodes[0].fy, Some(y));
	// the pin survives further simulation
	for _ in 0..20 {
		map.tick();
	}
	assert_eq!(map.topology().nodes[0].x, x + 30.0);
}

#[test]
fn empty_canvas_click_clears_selection_and_notifies() {
	let (mut map, recorder) = started();
	map.select_node_by_ci_id(1).unwrap();
	map.handle_pointer(PointerEvent::Down {
		x: -500.0,
		y: -500.0,
		button: PointerButton::Left,
	});
	map.handle_pointer(PointerEvent::Up {
		x: -500.0,
		y: -500.0,
	});
	assert_eq!(recorder.events(), vec![Recorded::Node(1), Recorded::Cleared]);
	assert_eq!(map.selection(), Selection::Empty);
	assert!(map.scene().nodes.iter().all(|v| !v.selected));
}

#[test]
fn selecting_a_link_drops_the_node_highlight() {
	let (mut map, recorder) = started();
	map.select_node_by_ci_id(1).unwrap();
	map.select_link_by_rlt_id(10).unwrap();
	assert_eq!(recorder.events(), vec![Recorded::Node(1), Recorded::Link(10)]);
	assert!(!map.scene().nodes[0].selected);
	assert!(map.scene().links[0].selected);
}

#[test]
fn hover_preview_dims_and_restores_through_the_facade() {
	let (mut map, _) = started();
	let (x, y) = node_center(&map, 0);
	map.handle_pointer(PointerEvent::Move { x, y });
	assert_eq!(map.preview(), Preview::Node(0));
	// both endpoints of the shared link stay visible
	assert!(map.scene().nodes.iter().all(|v| !v.dimmed));
	map.handle_pointer(PointerEvent::Leave);
	assert_eq!(map.preview(), Preview::None);
	assert!(map.scene().nodes.iter().all(|v| !v.dimmed));
}

#[test]
fn restart_replaces_the_scene_entirely() {
	let (mut map, _) = started();
	map.select_node_by_ci_id(1).unwrap();
	map.start(vec![node(3)], vec![], classes()).unwrap();
	assert_eq!(map.generation(), 2);
	let scene = map.scene();
	assert_eq!(scene.nodes.len(), 1);
	assert_eq!(scene.nodes[0].id, "N_3");
	assert!(scene.links.is_empty());
	assert_eq!(map.selection(), Selection::Empty);
	map.tick();
	assert!(map.scene().nodes[0].x.is_finite());
}

#[test]
fn start_fails_fast_on_dangling_endpoints() {
	let (mut map, _) = engine();
	let err = map
		.start(vec![node(1)], vec![link(10, 1, 42)], classes())
		.unwrap_err();
	assert!(matches!(
		err,
		TopologyError::UnknownLinkEndpoint {
			link_id: 10,
			endpoint_id: 42
		}
	));
	assert!(!map.is_running());
}

#[test]
fn start_fails_fast_on_missing_class_metadata() {
	let (mut map, _) = engine();
	let mut orphan = node(1);
	orphan.class_id = 99;
	let err = map.start(vec![orphan], vec![], classes()).unwrap_err();
	assert!(matches!(
		err,
		TopologyError::MissingClassInfo {
			node_id: 1,
			class_id: 99
		}
	));
}

#[test]
fn empty_graph_is_a_valid_inert_scene() {
	let (mut map, recorder) = engine();
	map.start(vec![], vec![], ClassInfoMap::new()).unwrap();
	map.tick();
	map.handle_pointer(PointerEvent::Move { x: 10.0, y: 10.0 });
	map.handle_pointer(PointerEvent::Down {
		x: 10.0,
		y: 10.0,
		button: PointerButton::Left,
	});
	map.handle_pointer(PointerEvent::Up { x: 10.0, y: 10.0 });
	assert!(map.scene().nodes.is_empty());
	assert_eq!(recorder.events(), vec![Recorded::Cleared]);
}

#[test]
fn change_zoom_is_idempotent() {
	let mut map = TopologyMap::new(MapConfig::default(), Rc::new(NullEvents));
	map.start(vec![node(1)], vec![], classes()).unwrap();
	map.change_zoom(40.0, -10.0, 2.5);
	let once = *map.transform();
	map.change_zoom(40.0, -10.0, 2.5);
	assert_eq!(*map.transform(), once);
	map.change_zoom(0.0, 0.0, 1.0);
	assert_eq!(map.transform().k, 1.0);
}

#[test]
fn disposed_engine_ignores_ticks_and_pointers() {
	let (mut map, recorder) = started();
	map.dispose();
	let before = map.topology().nodes[0].x;
	map.tick();
	assert_eq!(map.topology().nodes[0].x, before);
	let (x, y) = node_center(&map, 0);
	map.handle_pointer(PointerEvent::Down {
		x,
		y,
		button: PointerButton::Left,
	});
	map.handle_pointer(PointerEvent::Up { x, y });
	assert_eq!(recorder.events(), vec![]);
}
