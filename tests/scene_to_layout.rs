//! End-to-end: scene JSON through the builder, bundler and layout.

use scene_graph_canvas::components::force_graph::{Simulation, SimulationConfig, bundle_edges};
use scene_graph_canvas::scene::{Scene, Story, build_graph};

const GREETING: &str = r#"{
	"characters": {"A": null, "B": null},
	"actions": {"action_1": {"title": "greets", "initiators": ["A"], "receivers": ["B"]}}
}"#;

fn distance(sim: &Simulation, a: &str, b: &str) -> f64 {
	let (a, b) = (sim.node(a).unwrap(), sim.node(b).unwrap());
	(a.x - b.x).hypot(a.y - b.y)
}

#[test]
fn two_character_scene_settles_near_rest_distance() {
	let scene = Scene::from_json(GREETING).unwrap();
	let graph = build_graph(Some(&scene)).unwrap();
	assert_eq!(graph.nodes.len(), 2);
	assert_eq!(graph.edges.len(), 1);
	assert_eq!(graph.edges[0].relationship.as_deref(), Some("greets"));

	let config = SimulationConfig::default();
	let mut sim = Simulation::new(&graph, config.clone());
	sim.advance(300);
	let d = distance(&sim, "a", "b");
	assert!((d - config.rest_distance).abs() < 1.0, "settled at {d}");
}

#[test]
fn identical_input_gives_identical_layout() {
	let scene = Scene::from_json(
		r#"{
			"characters": {"Ann": null, "Bo": null, "Cy": null, "Di": null},
			"actions": {
				"action_1": {"title": "calls", "initiators": ["Ann"], "receivers": ["Bo", "Cy"]},
				"action_2": {"title": "answers", "initiators": ["Cy"], "receivers": ["Ann"]},
				"action_3": {"title": "leaves", "initiators": ["Di"], "receivers": ["the crowd"]}
			}
		}"#,
	)
	.unwrap();
	let run = || {
		let graph = build_graph(Some(&scene)).unwrap();
		let mut sim = Simulation::new(&graph, SimulationConfig::default());
		sim.advance(120);
		sim.nodes()
			.iter()
			.map(|n| (n.node.id.clone(), n.x, n.y))
			.collect::<Vec<_>>()
	};
	assert_eq!(run(), run());
}

#[test]
fn wildcard_fans_out_and_unused_characters_are_pruned() {
	let scene = Scene::from_json(
		r#"{
			"characters": {"Ann": null, "Bo": null, "Silent Sam": null},
			"actions": {
				"action_2": {"title": "cheer", "initiators": ["ALL"], "receivers": ["The King (offstage)"]},
				"action_1": {"title": "nods", "initiators": ["Ann"], "receivers": ["Bo"]}
			}
		}"#,
	)
	.unwrap();
	let graph = build_graph(Some(&scene)).unwrap();

	// every roster member reaches the group node, so nobody is pruned here
	let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, ["ann", "bo", "silent sam", "the king"]);
	let king = graph.nodes.iter().find(|n| n.id == "the king").unwrap();
	assert_eq!(king.label, "The King");

	// action_1 sorts first despite appearing second
	let events: Vec<_> = graph.edges.iter().map(|e| e.event.as_str()).collect();
	assert_eq!(events, ["action_1", "action_2", "action_2", "action_2"]);
}

#[test]
fn pruning_drops_characters_without_edges() {
	let scene = Scene::from_json(
		r#"{
			"characters": {"Ann": null, "Bo": null, "Cy": null},
			"actions": {"action_1": {"title": "waves", "initiators": ["Ann"], "receivers": ["Bo"]}}
		}"#,
	)
	.unwrap();
	let graph = build_graph(Some(&scene)).unwrap();
	assert!(graph.nodes.iter().all(|n| n.id != "cy"));
}

#[test]
fn repeated_pairs_are_bundled_around_zero() {
	let scene = Scene::from_json(
		r#"{
			"characters": {"A": null, "B": null},
			"actions": {
				"action_1": {"title": "greets", "initiators": ["A"], "receivers": ["B"]},
				"action_2": {"title": "replies", "initiators": ["B"], "receivers": ["A"]},
				"action_3": {"title": "leaves", "initiators": ["A"], "receivers": ["B"]}
			}
		}"#,
	)
	.unwrap();
	let graph = build_graph(Some(&scene)).unwrap();
	let bundled = bundle_edges(&graph.edges);
	let offsets: Vec<_> = bundled.iter().map(|e| e.curve_index).collect();
	assert_eq!(offsets, [-1.0, 0.0, 1.0]);
	assert!(bundled.iter().all(|e| e.group_size == 3));
}

#[test]
fn bundled_sample_story_loads_every_scene() {
	let story = Story::from_json(include_str!("../data/story.json")).unwrap();
	assert!(story.layout.is_some());
	for key in story.scene_keys() {
		let graph = build_graph(story.scene(key).ok()).unwrap();
		assert!(!graph.nodes.is_empty(), "{key} has no nodes");
		for edge in &graph.edges {
			assert_ne!(edge.source, edge.target);
			assert!(graph.nodes.iter().any(|n| n.id == edge.source));
			assert!(graph.nodes.iter().any(|n| n.id == edge.target));
		}
	}
	assert!(story.scene("no_such_scene").is_err());
}

#[test]
fn missing_scene_builds_nothing() {
	assert!(build_graph(None).is_none());
}

#[test]
fn zero_softening_override_stays_finite() {
	let story = Story::from_json(&format!(
		r#"{{"layout": {{"epsilon": 0}}, "scenes": {{"s1": {GREETING}}}}}"#
	))
	.unwrap();
	let graph = build_graph(story.scene("s1").ok()).unwrap();
	let mut sim = Simulation::new(&graph, story.layout.clone().unwrap_or_default());
	sim.set_position("a", -50.0, -50.0);
	sim.set_position("b", -50.0, -50.0);
	sim.advance(3);
	for p in sim.nodes() {
		assert!(p.x.is_finite() && p.y.is_finite(), "{} went non-finite", p.node.id);
	}
}

#[test]
fn repeated_receivers_each_get_an_edge() {
	let scene = Scene::from_json(
		r#"{
			"characters": {"A": null, "B": null},
			"actions": {"action_1": {"title": "greets", "initiators": ["A"], "receivers": ["B", "b"]}}
		}"#,
	)
	.unwrap();
	let graph = build_graph(Some(&scene)).unwrap();
	assert_eq!(graph.edges.len(), 2);
	let bundled = bundle_edges(&graph.edges);
	assert_eq!(
		bundled.iter().map(|e| e.curve_index).collect::<Vec<_>>(),
		[-0.5, 0.5]
	);
}
