use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ForceGraphState;
use crate::network::{NodeId, Position, ProjectedGraph, ViewMode, ViewUpdate};

/// Shared handle to the renderer's graph.
///
/// The dashboard mutates it between frames; the animation loop only reads it
/// inside its own frame callback, so every update is seen whole.
#[derive(Clone, Default)]
pub struct GraphHandle(Rc<RefCell<ForceGraphState>>);

impl GraphHandle {
	pub fn apply(&self, update: &ViewUpdate, mode: &ViewMode) {
		match update {
			ViewUpdate::Rebuild(projection) => self.rebuild(projection, mode),
			ViewUpdate::Restyle(snapshot) => {
				let report = self.0.borrow_mut().restyle(snapshot);
				debug!(
					"Restyled {} nodes ({} unchanged, {} stale)",
					report.changed, report.unchanged, report.stale
				);
			}
		}
	}

	pub fn rebuild(&self, projection: &ProjectedGraph, mode: &ViewMode) {
		let focus = match mode {
			ViewMode::Zoom { focus, .. } => focus.as_ref(),
			_ => None,
		};
		let mut state = self.0.borrow_mut();
		state.load(projection, focus);
		if projection.is_empty() {
			state.placeholder = match mode {
				ViewMode::Zoom { .. } => "No focus selected. Double-click a node in another view to zoom in.",
				_ => "The network is empty",
			}
			.into();
		}
	}

	pub fn positions(&self) -> HashMap<NodeId, Position> {
		self.0.borrow().positions()
	}
}

#[component]
pub fn ForceGraphCanvas(
	graph: GraphHandle,
	#[prop(optional)] on_focus: Option<Rc<dyn Fn(NodeId)>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = graph.0.clone();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
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
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};
		state_init.borrow_mut().resize(w, h);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				state_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut guard = state_anim.borrow_mut();
				let s = &mut *guard;
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_md.borrow_mut();
		let s = &mut *guard;
		if let Some(idx) = s.node_at_position(x, y) {
			let (mut start_x, mut start_y) = (0.0, 0.0);
			s.graph.visit_nodes(|node| {
				if node.index() == idx {
					(start_x, start_y) = (node.x(), node.y());
				}
			});
			s.drag.active = true;
			s.drag.node_idx = Some(idx);
			s.drag.start_x = x;
			s.drag.start_y = y;
			s.drag.node_start_x = start_x;
			s.drag.node_start_y = start_y;
		} else {
			s.pan.active = true;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_mm.borrow_mut();
		let s = &mut *guard;
		// Update hover state when not dragging
		if !s.drag.active {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
		}

		if s.drag.active {
			if let Some(idx) = s.drag.node_idx {
				let (dx, dy) = (
					(x - s.drag.start_x) / s.transform.k,
					(y - s.drag.start_y) / s.transform.k,
				);
				let (nx, ny) = (
					s.drag.node_start_x + dx as f32,
					s.drag.node_start_y + dy as f32,
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
			s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
			s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut guard = state_mu.borrow_mut();
		let s = &mut *guard;
		s.drag.active = false;
		s.drag.node_idx = None;
		s.pan.active = false;
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut guard = state_ml.borrow_mut();
		let s = &mut *guard;
		s.drag.active = false;
		s.drag.node_idx = None;
		s.pan.active = false;
		s.set_hover(None);
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		// Release the borrow before the callback reprojects into this state.
		let picked = {
			let s = state_dc.borrow();
			s.node_at_position(x, y)
				.and_then(|idx| s.node_id(idx).cloned())
		};
		if let (Some(id), Some(cb)) = (picked, on_focus.as_ref()) {
			cb(id);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_wh.borrow_mut();
		let s = &mut *guard;
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / s.transform.k;
		s.transform.x = x - (x - s.transform.x) * ratio;
		s.transform.y = y - (y - s.transform.y) * ratio;
		s.transform.k = new_k;
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
