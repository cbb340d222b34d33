//! Story and scene records as they arrive from the story store.
//!
//! Everything here is plain serde data. Maps keep document order so that the
//! character roster is read in the order the author wrote it.

mod builder;
pub mod normalize;

pub use builder::build_graph;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::components::force_graph::SimulationConfig;
use crate::error::{Error, Result};

/// A story: a titled, ordered collection of scenes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Story {
	/// Display title.
	#[serde(default)]
	pub title: String,
	/// Optional blurb shown under the title.
	#[serde(default)]
	pub description: Option<String>,
	/// Layout overrides; any omitted field keeps its default.
	#[serde(default)]
	pub layout: Option<SimulationConfig>,
	/// Scenes keyed by their identifier, in document order.
	#[serde(default)]
	pub scenes: IndexMap<String, Scene>,
}

impl Story {
	/// Parse a story document.
	pub fn from_json(src: &str) -> Result<Self> {
		Ok(serde_json::from_str(src)?)
	}

	/// Look up a scene by key.
	pub fn scene(&self, key: &str) -> Result<&Scene> {
		self.scenes
			.get(key)
			.ok_or_else(|| Error::UnknownScene(key.to_string()))
	}

	/// Scene keys in document order.
	pub fn scene_keys(&self) -> impl Iterator<Item = &str> {
		self.scenes.keys().map(String::as_str)
	}
}

/// One scene: who is present and what happens between them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Scene {
	/// Optional scene heading.
	#[serde(default)]
	pub title: Option<String>,
	/// Roster keyed by raw character identifier. Profiles may be `null`.
	#[serde(default)]
	pub characters: IndexMap<String, Option<CharacterProfile>>,
	/// Events keyed by an identifier that embeds their sequence number.
	/// Individual events may be `null`.
	#[serde(default)]
	pub actions: IndexMap<String, Option<Action>>,
}

impl Scene {
	/// Parse a single scene document.
	pub fn from_json(src: &str) -> Result<Self> {
		Ok(serde_json::from_str(src)?)
	}
}

/// Per-character profile data.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CharacterProfile {
	/// Free-text description.
	#[serde(default)]
	pub description: Option<String>,
	/// Faction or household the character belongs to.
	#[serde(default)]
	pub affiliation: Option<String>,
	/// Scores shown in the statistics panel.
	#[serde(default)]
	pub stats: CharacterStats,
}

/// Up to three bipolar scores. Any of them may be missing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CharacterStats {
	/// Virtuous versus villainous.
	#[serde(default)]
	pub morality: Option<BipolarScore>,
	/// Calm versus volatile.
	#[serde(default)]
	pub temperament: Option<BipolarScore>,
	/// Loyal versus treacherous.
	#[serde(default)]
	pub allegiance: Option<BipolarScore>,
}

impl CharacterStats {
	/// True when no dimension is present.
	pub fn is_empty(&self) -> bool {
		self.morality.is_none() && self.temperament.is_none() && self.allegiance.is_none()
	}

	/// Present dimensions with their display names, in fixed order.
	pub fn dimensions(&self) -> Vec<(&'static str, &BipolarScore)> {
		[
			("Morality", self.morality.as_ref()),
			("Temperament", self.temperament.as_ref()),
			("Allegiance", self.allegiance.as_ref()),
		]
		.into_iter()
		.filter_map(|(name, score)| score.map(|s| (name, s)))
		.collect()
	}
}

/// Two opposing poles with magnitudes, plus the reasoning behind them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BipolarScore {
	/// The pole drawn on the left.
	pub low: Pole,
	/// The pole drawn on the right.
	pub high: Pole,
	/// Why the character scores this way.
	#[serde(default)]
	pub justification: Option<String>,
}

/// One end of a [`BipolarScore`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Pole {
	/// Name of the pole, e.g. "Loyal".
	pub label: String,
	/// Magnitude on a 0..=100 scale.
	#[serde(default)]
	pub value: f64,
}

impl Pole {
	/// Magnitude clamped to 0..=100; NaN reads as 0.
	pub fn clamped(&self) -> f64 {
		if self.value.is_nan() {
			0.0
		} else {
			self.value.clamp(0.0, 100.0)
		}
	}
}

/// A narrative event between participants.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Action {
	/// Short label, used as the edge relationship.
	#[serde(default)]
	pub title: String,
	/// Longer prose shown in the tooltip.
	#[serde(default)]
	pub description: Option<String>,
	/// Raw identifiers of whoever acts.
	#[serde(default)]
	pub initiators: Vec<String>,
	/// Raw identifiers of whoever is acted upon.
	#[serde(default)]
	pub receivers: Vec<String>,
}
