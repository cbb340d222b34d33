use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use super::normalize::{event_order_key, format_label, normalize_id};
use super::{Action, Scene};
use crate::components::force_graph::{GraphData, GraphEdge, GraphNode, NodeId, NodeKind};

/// Participant token that stands for every character in the roster.
pub const WILDCARD: &str = "ALL";

/// Turn a scene record into a pruned node/edge graph.
///
/// `None` in, `None` out: no scene means nothing to draw. Node order is roster
/// order followed by group nodes in first-seen order; edge order is event,
/// then initiator, then receiver. Pairs that resolve to the same node are
/// dropped, so an event without receivers contributes nothing.
pub fn build_graph(scene: Option<&Scene>) -> Option<GraphData> {
	let scene = scene?;

	let mut characters: IndexMap<NodeId, GraphNode> = IndexMap::new();
	for (raw, profile) in &scene.characters {
		let id = normalize_id(raw);
		if id.is_empty() || characters.contains_key(&id) {
			continue;
		}
		let profile = profile.as_ref();
		characters.insert(
			id.clone(),
			GraphNode {
				id,
				label: format_label(raw),
				kind: NodeKind::Character,
				group: profile.and_then(|p| p.affiliation.clone()),
				stats: profile
					.map(|p| &p.stats)
					.filter(|s| !s.is_empty())
					.cloned(),
			},
		);
	}

	let mut events: Vec<(&String, &Action)> = scene
		.actions
		.iter()
		.filter_map(|(key, action)| action.as_ref().map(|a| (key, a)))
		.collect();
	// stable: unnumbered keys keep document order after the numbered ones
	events.sort_by_key(|(key, _)| match event_order_key(key) {
		Some(n) => (0, n),
		None => (1, 0),
	});

	let mut groups: IndexMap<NodeId, GraphNode> = IndexMap::new();
	let mut edges = Vec::new();
	for (key, action) in events {
		let initiators = expand(&action.initiators, &characters, &mut groups);
		let receivers = expand(&action.receivers, &characters, &mut groups);
		for source in &initiators {
			for target in &receivers {
				if source == target {
					continue;
				}
				edges.push(GraphEdge {
					source: source.clone(),
					target: target.clone(),
					relationship: Some(action.title.clone()).filter(|t| !t.is_empty()),
					description: action.description.clone(),
					event: key.clone(),
				});
			}
		}
	}

	let used: HashSet<&str> = edges
		.iter()
		.flat_map(|e| [e.source.as_str(), e.target.as_str()])
		.collect();
	let nodes: Vec<GraphNode> = characters
		.into_values()
		.chain(groups.into_values())
		.filter(|n| used.contains(n.id.as_str()))
		.collect();

	debug!(
		"built scene graph: {} nodes, {} edges",
		nodes.len(),
		edges.len()
	);
	Some(GraphData { nodes, edges })
}

/// Resolve participant tokens to node ids, registering group nodes for
/// anything outside the roster. Every token contributes its ids, repeats
/// included, so each declared pairing yields its own edge.
fn expand(
	tokens: &[String],
	characters: &IndexMap<NodeId, GraphNode>,
	groups: &mut IndexMap<NodeId, GraphNode>,
) -> Vec<NodeId> {
	let mut out: Vec<NodeId> = Vec::new();
	for token in tokens {
		if token.trim() == WILDCARD {
			out.extend(characters.keys().cloned());
			continue;
		}
		let id = normalize_id(token);
		if id.is_empty() {
			continue;
		}
		if !characters.contains_key(&id) {
			groups.entry(id.clone()).or_insert_with(|| GraphNode {
				id: id.clone(),
				label: format_label(token),
				kind: NodeKind::Group,
				group: None,
				stats: None,
			});
		}
		out.push(id);
	}
	out
}
