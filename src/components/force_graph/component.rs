use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent};

use super::interaction::{PointerCapture, PointerInput, ScreenTransform};
use super::render;
use super::scheduler::{PendingFrame, TickLoop};
use super::simulation::SimulationConfig;
use super::state::{ForceGraphState, HoverTarget};
use super::types::GraphData;

/// Pointer capture on the canvas element itself.
struct CanvasCapture(HtmlCanvasElement);

impl PointerCapture for CanvasCapture {
	fn capture(&mut self, pointer_id: i32) {
		let _ = self.0.set_pointer_capture(pointer_id);
	}

	fn release(&mut self, pointer_id: i32) {
		let _ = self.0.release_pointer_capture(pointer_id);
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

fn pointer_input(ev: &PointerEvent) -> PointerInput {
	PointerInput {
		pointer_id: ev.pointer_id(),
		client_x: ev.client_x() as f64,
		client_y: ev.client_y() as f64,
	}
}

/// Draws `data` as a live force-directed graph. A new graph value reseeds the
/// layout; `None` clears the canvas.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<Option<GraphData>>,
	#[prop(optional)] config: Option<SimulationConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional, into)] on_hover: Option<Callback<Option<HoverTarget>>>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let (logical_w, logical_h) = (config.width, config.height);
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let pending_frame = PendingFrame::new();
	let tick_loop = TickLoop::new();

	let notify = move |target: Option<HoverTarget>| {
		if let Some(cb) = on_hover {
			cb.run(target);
		}
	};

	{
		// the frame closure is dropped with the effect; never leave a request
		// pointing at it
		let (tick_loop, pending) = (tick_loop.clone(), pending_frame.clone());
		on_cleanup(move || {
			tick_loop.cancel_all();
			if let (Some(id), Some(window)) = (pending.take(), web_sys::window()) {
				let _ = window.cancel_animation_frame(id);
			}
		});
	}

	let (state_init, animate_init, pending_init) =
		(state.clone(), animate.clone(), pending_frame.clone());
	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		// stop the previous loop before its closure is replaced
		let token = tick_loop.start();
		if let Some(id) = pending_init.take() {
			let _ = window.cancel_animation_frame(id);
		}
		if let Some(ref mut old) = *state_init.borrow_mut() {
			old.interaction
				.cancel_all(&mut old.sim, &mut CanvasCapture(canvas.clone()));
		}
		notify(None);

		canvas.set_width(logical_w as u32);
		canvas.set_height(logical_h as u32);
		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas has no 2d context");
			return;
		};
		let Some(graph) = graph else {
			*state_init.borrow_mut() = None;
			ctx.clear_rect(0.0, 0.0, logical_w, logical_h);
			return;
		};
		*state_init.borrow_mut() = Some(ForceGraphState::new(&graph, config.clone()));

		// weak: the closure must not keep its own slot alive
		let (state_anim, animate_inner, pending_inner) = (
			state_init.clone(),
			Rc::downgrade(&animate_init),
			pending_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			pending_inner.set(None);
			if !token.is_active() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.frame(now) {
					render::render(s, &ctx);
				}
			}
			let (Some(slot), Some(win)) = (animate_inner.upgrade(), web_sys::window()) else {
				return;
			};
			if let Some(cb) = slot.borrow().as_ref() {
				pending_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			pending_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	// canvas element plus the current screen-to-simulation mapping
	let surface = move || -> Option<(HtmlCanvasElement, ScreenTransform)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		let transform = ScreenTransform::new(
			rect.left(),
			rect.top(),
			rect.width(),
			rect.height(),
			logical_w,
			logical_h,
		);
		Some((canvas, transform))
	};
	let redraw = |s: &ForceGraphState, canvas: &HtmlCanvasElement| {
		if let Some(ctx) = context_2d(canvas) {
			render::render(s, &ctx);
		}
	};

	let state_pd = state.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some((canvas, transform)) = surface() else {
			return;
		};
		if let Some(ref mut s) = *state_pd.borrow_mut() {
			let mut capture = CanvasCapture(canvas.clone());
			if s.pointer_down(&mut capture, pointer_input(&ev), &transform, now_ms()) {
				ev.prevent_default();
				redraw(s, &canvas);
			}
		}
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some((canvas, transform)) = surface() else {
			return;
		};
		let hovered = {
			let mut guard = state_pm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let dragging = s.interaction.is_pointer_dragging(ev.pointer_id());
			if !s.pointer_move(pointer_input(&ev), &transform, now_ms()) {
				return;
			}
			redraw(s, &canvas);
			(!dragging).then(|| s.hover_target())
		};
		if let Some(target) = hovered {
			notify(target);
		}
	};

	let state_pu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let Some((canvas, _)) = surface() else {
			return;
		};
		if let Some(ref mut s) = *state_pu.borrow_mut() {
			if s.pointer_up(&mut CanvasCapture(canvas.clone()), ev.pointer_id()) {
				redraw(s, &canvas);
			}
		}
	};

	let state_pc = state.clone();
	let on_pointercancel = move |ev: PointerEvent| {
		let Some((canvas, _)) = surface() else {
			return;
		};
		if let Some(ref mut s) = *state_pc.borrow_mut() {
			s.pointer_up(&mut CanvasCapture(canvas), ev.pointer_id());
		}
	};

	let state_pl = state.clone();
	let on_pointerleave = move |ev: PointerEvent| {
		let Some((canvas, _)) = surface() else {
			return;
		};
		let changed = match *state_pl.borrow_mut() {
			Some(ref mut s) => {
				let changed = s.pointer_leave(&mut CanvasCapture(canvas.clone()), ev.pointer_id());
				if changed {
					redraw(s, &canvas);
				}
				changed
			}
			None => false,
		};
		if changed {
			notify(None);
		}
	};

	let style = if fullscreen {
		format!(
			"display: block; margin: 0 auto; width: min(100vw, calc(100vh * {logical_w} / {logical_h})); height: auto; touch-action: none; cursor: grab;"
		)
	} else {
		"display: block; width: 100%; height: auto; touch-action: none; cursor: grab;".to_string()
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
			on:pointerleave=on_pointerleave
			style=style
		/>
	}
}
