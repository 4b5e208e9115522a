use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::stabilizer::SettleTicket;
use super::state::CardGraphState;
use super::types::GraphSettings;
use crate::cards::{Card, DEFAULT_MAX_DEPTH, build_graph};

type SharedState = Rc<RefCell<Option<CardGraphState>>>;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
	)
}

fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		if let Some(window) = web_sys::window() {
			return window_size(&window);
		}
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

/// Pointer position relative to the canvas.
fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Release the pin after the settle delay, against whatever view exists then.
fn schedule_release(state: SharedState, ticket: SettleTicket, delay_ms: u64) {
	set_timeout(
		move || {
			if let Some(ref mut s) = *state.borrow_mut() {
				s.release(&ticket);
			}
		},
		Duration::from_millis(delay_ms),
	);
}

/// Force-directed view of the cards reachable from `center_id`.
#[component]
pub fn CardGraphCanvas(
	#[prop(into)] cards: Signal<Vec<Card>>,
	#[prop(into)] center_id: Signal<String>,
	#[prop(into, default = Signal::stored(DEFAULT_MAX_DEPTH))] max_depth: Signal<usize>,
	#[prop(into, default = Signal::stored(String::new()))] search: Signal<String>,
	#[prop(optional, into)] on_select: Option<Callback<Card>>,
	#[prop(default = GraphSettings::default())] settings: GraphSettings,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let settle_delay_ms = settings.settle_delay_ms;

	// Canvas setup and the animation loop, once per mount.
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = measure(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas 2d context unavailable");
			return;
		};

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Fresh graph whenever the collection, center or depth changes.
	let state_build = state.clone();
	Effect::new(move |_| {
		let (cards, center, depth) = (cards.get(), center_id.get(), max_depth.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = measure(&canvas, fullscreen, width, height);
		let graph = build_graph(&cards, &center, depth);
		debug!("rebuilding graph view around {center} (depth {depth})");
		let mut s = CardGraphState::new(graph, settings.clone(), w, h);
		s.set_search(&search.get_untracked());
		*state_build.borrow_mut() = Some(s);
	});

	let state_search = state.clone();
	Effect::new(move |_| {
		let query = search.get();
		if let Some(ref mut s) = *state_search.borrow_mut() {
			s.set_search(&query);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let (ticket, clicked) = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(x, y),
			None => return,
		};
		if let Some(ticket) = ticket {
			schedule_release(state_mu.clone(), ticket, settle_delay_ms);
		}
		if let (Some(card), Some(cb)) = (clicked, on_select) {
			cb.run(card);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let (x, y) = local_position(canvas_ref, &ev).unwrap_or_default();
		let ticket = match *state_ml.borrow_mut() {
			Some(ref mut s) => {
				s.clear_hover();
				s.pointer_cancel(x, y)
			}
			None => return,
		};
		if let Some(ticket) = ticket {
			schedule_release(state_ml.clone(), ticket, settle_delay_ms);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y() < 0.0);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="card-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
