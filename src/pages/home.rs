use std::sync::Arc;

use leptos::prelude::*;
use log::warn;

use crate::components::force_graph::{ForceGraphCanvas, HoverTarget};
use crate::components::stats_panel::StatsPanel;
use crate::scene::{Story, build_graph};

const STORY_JSON: &str = include_str!("../../data/story.json");

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let story = Story::from_json(STORY_JSON).map(Arc::new);
	if let Err(ref e) = story {
		warn!("could not load story: {e}");
	}

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>{story.map(|story| view! { <StoryView story /> })}</ErrorBoundary>
	}
}

/// Scene picker, live graph, and the hover panel for one loaded story.
#[component]
fn StoryView(story: Arc<Story>) -> impl IntoView {
	let keys: Vec<String> = story.scene_keys().map(String::from).collect();
	let selected = RwSignal::new(keys.first().cloned());
	let (hovered, set_hovered) = signal(None::<HoverTarget>);
	let config = story.layout.clone().unwrap_or_default();

	let graph = Signal::derive({
		let story = story.clone();
		move || {
			let key = selected.get()?;
			let scene = story
				.scene(&key)
				.inspect_err(|e| warn!("{e}"))
				.ok();
			build_graph(scene)
		}
	});

	let picker = keys
		.into_iter()
		.map(|key| {
			let label = story
				.scenes
				.get(&key)
				.and_then(|s| s.title.clone())
				.unwrap_or_else(|| key.clone());
			let current = key.clone();
			view! {
				<button
					class:active=move || selected.get().as_deref() == Some(current.as_str())
					on:click=move |_| selected.set(Some(key.clone()))
				>
					{label}
				</button>
			}
		})
		.collect_view();

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas
				data=graph
				config=config
				fullscreen=true
				on_hover=Callback::new(move |target: Option<HoverTarget>| set_hovered.set(target))
			/>
			<div class="graph-overlay">
				<h1>{story.title.clone()}</h1>
				{story.description.clone().map(|d| view! { <p class="subtitle">{d}</p> })}
				<nav class="scene-picker">{picker}</nav>
			</div>
			<StatsPanel target=hovered />
		</div>
	}
}
