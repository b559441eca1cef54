use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent,
	WheelEvent, Window,
};

use super::render;
use super::session::{ClickMode, Session};
use super::state::CLICK_SLOP;
use crate::interactome::{InteractionRecord, ViewerConfig};

type Listener<E> = Rc<RefCell<Option<Closure<dyn FnMut(E)>>>>;
type FrameLoop = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive canvas for an interaction table.
///
/// Every change of `records` builds a fresh graph, clusters and colors it and
/// resets the focus history. Clicking a node focuses its neighborhood
/// (shift adds to the focus, alt subtracts, repeated clicks widen the radius),
/// space shows the whole network again and ctrl/cmd+z steps back.
#[component]
pub fn InteractomeCanvas(
	#[prop(into)] records: Signal<Vec<InteractionRecord>>,
	#[prop(optional)] config: ViewerConfig,
	#[prop(into)] on_status: Callback<String>,
	#[prop(into)] on_select: Callback<Vec<(String, String)>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session: Rc<RefCell<Option<Session>>> = Rc::new(RefCell::new(None));
	let size: Rc<Cell<(f64, f64)>> = Rc::new(Cell::new((800.0, 600.0)));
	let animate: FrameLoop = Rc::new(RefCell::new(None));
	let resize_cb: FrameLoop = Rc::new(RefCell::new(None));
	let keydown_cb: Listener<KeyboardEvent> = Rc::new(RefCell::new(None));
	let (session_init, size_init) = (session.clone(), size.clone());

	Effect::new(move |_| {
		let rows = records.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		// Canvas, frame loop and listeners are set up once; later runs only
		// rebuild the session.
		if animate.borrow().is_none() {
			let (w, h) = if fullscreen {
				window_size(&window).unwrap_or((800.0, 600.0))
			} else {
				let parent = canvas.parent_element();
				(
					width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
					height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
				)
			};
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			size_init.set((w, h));

			let Ok(Some(ctx)) = canvas.get_context("2d") else {
				warn!("canvas has no 2d context");
				return;
			};
			let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() else {
				return;
			};

			if fullscreen {
				let (session_resize, size_resize, canvas_resize) =
					(session_init.clone(), size_init.clone(), canvas.clone());
				*resize_cb.borrow_mut() = Some(Closure::new(move || {
					let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
						return;
					};
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					size_resize.set((nw, nh));
					if let Some(ref mut s) = *session_resize.borrow_mut() {
						s.canvas.resize(nw, nh);
					}
				}));
				if let Some(ref cb) = *resize_cb.borrow() {
					let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}

			let session_keys = session_init.clone();
			*keydown_cb.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
				let typing = ev
					.target()
					.and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
					.is_some();
				if typing {
					return;
				}
				let mut guard = session_keys.borrow_mut();
				let Some(ref mut s) = *guard else {
					return;
				};
				let result = if ev.key() == " " {
					ev.prevent_default();
					s.clear_focus().map(|_| on_select.run(Vec::new()))
				} else if ev.key().eq_ignore_ascii_case("z") && (ev.meta_key() || ev.ctrl_key()) {
					ev.prevent_default();
					s.back().map(|popped| {
						if popped {
							debug!("focus depth now {}", s.depth());
						} else {
							debug!("already at the whole network");
						}
					})
				} else {
					Ok(())
				};
				if let Err(err) = result {
					on_status.run(err.to_string());
				}
			}));
			if let Some(ref cb) = *keydown_cb.borrow() {
				let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
			}

			let (session_anim, animate_inner, size_anim) =
				(session_init.clone(), animate.clone(), size_init.clone());
			*animate.borrow_mut() = Some(Closure::new(move || {
				match *session_anim.borrow_mut() {
					Some(ref mut s) => {
						if s.canvas.animation_running {
							s.canvas.tick(0.016);
						}
						render::render(&s.canvas, &ctx);
					}
					None => {
						let (w, h) = size_anim.get();
						render::clear(&ctx, w, h);
					}
				}
				if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}));
			if let Some(ref cb) = *animate.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}

		on_select.run(Vec::new());
		if rows.is_empty() {
			*session_init.borrow_mut() = None;
			return;
		}
		let (w, h) = size_init.get();
		let seed = js_sys::Date::now() as u64;
		let (next, summary) = Session::from_records(rows, &config, seed, w, h);
		on_status.run(summary.status(next.store()));
		*session_init.borrow_mut() = (!next.store().is_empty()).then_some(next);
	});

	let session_md = session.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *session_md.borrow_mut() {
			let s = &mut s.canvas;
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.moved = false;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let session_mm = session.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *session_mm.borrow_mut() {
			let s = &mut s.canvas;
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
				s.drag.moved |= dx.hypot(dy) > CLICK_SLOP;
				if let (Some(idx), true) = (s.drag.node_idx, s.drag.moved) {
					let (nx, ny) = (
						s.drag.node_start_x + (dx / s.transform.k) as f32,
						s.drag.node_start_y + (dy / s.transform.k) as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				s.pan.moved |= dx.hypot(dy) > CLICK_SLOP;
				if s.pan.moved {
					s.cancel_fit();
					s.transform.x = s.pan.transform_start_x + dx;
					s.transform.y = s.pan.transform_start_y + dy;
				}
			}
		}
	};

	let session_mu = session.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *session_mu.borrow_mut() {
			let s = &mut s.canvas;
			s.suppress_click = s.drag.moved || s.pan.moved;
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
	};

	let session_ml = session.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *session_ml.borrow_mut() {
			let s = &mut s.canvas;
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let session_click = session.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut guard = session_click.borrow_mut();
		let Some(ref mut s) = *guard else {
			return;
		};
		if std::mem::take(&mut s.canvas.suppress_click) {
			return;
		}
		let Some(locus) = s.canvas.locus_at_position(x, y) else {
			return;
		};
		let mode = ClickMode::from_modifiers(ev.shift_key(), ev.alt_key());
		let clicks = ev.detail().max(1) as usize;
		match s.node_click(&locus, mode, clicks) {
			Ok(()) => on_select.run(s.details(&locus)),
			Err(err) => on_status.run(err.to_string()),
		}
	};

	let session_wh = session.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *session_wh.borrow_mut() {
			let s = &mut s.canvas;
			s.cancel_fit();
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="interactome-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:click=on_click
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
