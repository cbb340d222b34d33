//! Side panel for whatever the graph pointer is over.

use leptos::prelude::*;

use crate::components::force_graph::HoverTarget;
use crate::components::force_graph::scale::{BandScale, LinearScale, ticks};
use crate::scene::CharacterStats;

const PANEL_WIDTH: f64 = 260.0;
const ROW_HEIGHT: f64 = 44.0;
const AXIS_HEIGHT: f64 = 16.0;

/// Geometry for one diverging bar: the low pole grows left from the centre
/// line, the high pole grows right.
#[derive(Clone, Debug, PartialEq)]
pub struct StatRow {
	pub name: &'static str,
	pub low_label: String,
	pub high_label: String,
	pub y: f64,
	pub height: f64,
	pub low_x: f64,
	pub low_width: f64,
	pub high_width: f64,
	pub justification: Option<String>,
}

fn magnitude_scale(width: f64) -> LinearScale {
	LinearScale::new((0.0, 100.0), (0.0, width / 2.0 - 8.0))
}

pub fn stat_rows(stats: &CharacterStats, width: f64) -> Vec<StatRow> {
	let dims = stats.dimensions();
	let bands = BandScale::new(
		dims.iter().map(|(name, _)| *name),
		(0.0, dims.len() as f64 * ROW_HEIGHT),
	)
	.padding(0.3);
	let magnitude = magnitude_scale(width);
	let centre = width / 2.0;
	dims.into_iter()
		.filter_map(|(name, score)| {
			let low = magnitude.scale(score.low.clamped());
			let high = magnitude.scale(score.high.clamped());
			Some(StatRow {
				name,
				low_label: score.low.label.clone(),
				high_label: score.high.label.clone(),
				y: bands.position(name)?,
				height: bands.bandwidth(),
				low_x: centre - low,
				low_width: low,
				high_width: high,
				justification: score.justification.clone(),
			})
		})
		.collect()
}

/// Tick marks for one half of the axis as `(offset from centre, label)`.
pub fn axis_ticks(width: f64) -> Vec<(f64, String)> {
	let magnitude = magnitude_scale(width);
	ticks(0.0, 100.0, 2)
		.into_iter()
		.map(|v| (magnitude.scale(v), format!("{v}")))
		.collect()
}

#[component]
pub fn StatsPanel(#[prop(into)] target: Signal<Option<HoverTarget>>) -> impl IntoView {
	move || match target.get() {
		None => view! { <aside class="stats-panel empty">"Hover a character or a relationship."</aside> }.into_any(),
		Some(HoverTarget::Edge { relationship, description, source, target: dest }) => view! {
			<aside class="stats-panel">
				<h2>{relationship.unwrap_or_else(|| "Interaction".into())}</h2>
				<p class="edge-ends">{format!("{source} \u{2192} {dest}")}</p>
				{description.map(|d| view! { <p>{d}</p> })}
			</aside>
		}
		.into_any(),
		Some(HoverTarget::Node { label, stats, .. }) => {
			let body = match stats {
				Some(stats) => stat_chart(&stats).into_any(),
				None => view! { <p class="muted">"No statistics recorded."</p> }.into_any(),
			};
			view! {
				<aside class="stats-panel">
					<h2>{label}</h2>
					{body}
				</aside>
			}
			.into_any()
		}
	}
}

fn stat_chart(stats: &CharacterStats) -> impl IntoView + use<> {
	let rows = stat_rows(stats, PANEL_WIDTH);
	let centre = PANEL_WIDTH / 2.0;
	let chart_height = rows.len() as f64 * ROW_HEIGHT + AXIS_HEIGHT;
	let axis_y = chart_height - AXIS_HEIGHT + 12.0;
	let notes: Vec<_> = rows
		.iter()
		.filter_map(|r| r.justification.clone().map(|j| (r.name, j)))
		.collect();

	let bars = rows
		.into_iter()
		.map(|r| {
			view! {
				<g class="stat-row">
					<rect class="pole-low" x={r.low_x} y={r.y} width={r.low_width} height={r.height} />
					<rect class="pole-high" x={centre} y={r.y} width={r.high_width} height={r.height} />
					<text x="4" y={r.y - 2.0} class="pole-label">{r.low_label}</text>
					<text x={PANEL_WIDTH - 4.0} y={r.y - 2.0} text-anchor="end" class="pole-label">
						{r.high_label}
					</text>
				</g>
			}
		})
		.collect_view();

	let axis = axis_ticks(PANEL_WIDTH)
		.into_iter()
		.flat_map(|(dx, label)| {
			// mirrored on both sides of the centre line; 0 only once
			let sides = if dx == 0.0 { vec![centre] } else { vec![centre - dx, centre + dx] };
			sides.into_iter().map(move |x| {
				view! { <text x={x} y={axis_y} text-anchor="middle" class="tick">{label.clone()}</text> }
			})
		})
		.collect_view();

	view! {
		<svg class="stat-chart" width={PANEL_WIDTH} height={chart_height}>
			{bars}
			<line x1={centre} x2={centre} y1="0" y2={chart_height - AXIS_HEIGHT} class="centre-line" />
			{axis}
		</svg>
		<dl class="stat-notes">
			{notes
				.into_iter()
				.map(|(name, note)| view! { <dt>{name}</dt> <dd>{note}</dd> })
				.collect_view()}
		</dl>
	}
}
