use std::collections::HashMap;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use yew::prelude::*;

use super::app::AppContext;
use crate::config::AppConfig;
use crate::model::{MapAction, MapState};
use crate::state::viewport::{TILE_PX, project};
use crate::state::{DragState, Viewport};

const TILE_CACHE_LIMIT: usize = 512;

type TileCache = HashMap<String, HtmlImageElement>;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub state: UseReducerHandle<MapState>,
}

fn draw_tiles(
    ctx: &CanvasRenderingContext2d,
    vp: &Viewport,
    config: &AppConfig,
    tiles: &mut TileCache,
    onload: &js_sys::Function,
) {
    // Integer tile zoom, stretched by the fractional remainder
    let z = vp.zoom.floor().max(0.0);
    let scale = 2f64.powf(vp.zoom - z);
    let n = 1i64 << (z as u32);
    let (cx, cy) = project(vp.latitude, vp.longitude, z);
    let left = cx - vp.width / 2.0 / scale;
    let top = cy - vp.height / 2.0 / scale;
    let span = TILE_PX * scale;
    let tx0 = (left / TILE_PX).floor() as i64;
    let tx1 = ((left + vp.width / scale) / TILE_PX).floor() as i64;
    let ty0 = ((top / TILE_PX).floor() as i64).max(0);
    let ty1 = (((top + vp.height / scale) / TILE_PX).floor() as i64).min(n - 1);
    if tiles.len() > TILE_CACHE_LIMIT {
        tiles.clear();
    }
    for ty in ty0..=ty1 {
        for tx in tx0..=tx1 {
            let sx = (tx as f64 * TILE_PX - left) * scale;
            let sy = (ty as f64 * TILE_PX - top) * scale;
            let url = config.tile(z as u32, tx.rem_euclid(n) as u32, ty as u32);
            let img = match tiles.get(&url) {
                Some(img) => img.clone(),
                None => {
                    let Ok(img) = HtmlImageElement::new() else {
                        continue;
                    };
                    img.set_onload(Some(onload));
                    img.set_src(&url);
                    tiles.insert(url, img.clone());
                    img
                }
            };
            if img.complete() && img.natural_width() > 0 {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(&img, sx, sy, span, span)
                    .ok();
            } else {
                ctx.set_fill_style_str("#e8e4da");
                ctx.fill_rect(sx, sy, span, span);
                ctx.set_stroke_style_str("#d6d1c4");
                ctx.set_line_width(1.0);
                ctx.stroke_rect(sx, sy, span, span);
            }
        }
    }
}

/// Drop-shaped marker whose tip sits on `(x, y)`.
fn draw_marker(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    size: f64,
    fill: &str,
    highlight: bool,
) {
    let r = size * 0.3;
    let head_y = y - size + r;
    ctx.set_fill_style_str(fill);
    ctx.begin_path();
    ctx.arc(x, head_y, r, 0.0, PI * 2.0).ok();
    ctx.fill();
    ctx.begin_path();
    ctx.move_to(x - r * 0.85, head_y + r * 0.5);
    ctx.line_to(x + r * 0.85, head_y + r * 0.5);
    ctx.line_to(x, y);
    ctx.close_path();
    ctx.fill();
    ctx.set_fill_style_str("#ffffff");
    ctx.begin_path();
    ctx.arc(x, head_y, r * 0.4, 0.0, PI * 2.0).ok();
    ctx.fill();
    if highlight {
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(x, head_y, r + 2.0, 0.0, PI * 2.0).ok();
        ctx.stroke();
    }
}

fn draw_map(
    ctx: &CanvasRenderingContext2d,
    state: &MapState,
    config: &AppConfig,
    tiles: &mut TileCache,
    onload: &js_sys::Function,
) {
    let vp = state.viewport;
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str("#aadaff");
    ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
    draw_tiles(ctx, &vp, config, tiles, onload);

    let size = vp.marker_size();
    let selected = state.selected_pin().map(|p| p.id.as_str());
    for p in &state.pins {
        let (x, y) = vp.to_screen(p.latitude, p.longitude);
        if x < -size || x > vp.width + size || y < 0.0 || y > vp.height + size {
            continue;
        }
        let color = if state.is_own(p) { "tomato" } else { "slateblue" };
        draw_marker(ctx, x, y, size, color, selected == Some(p.id.as_str()));
    }
    if let Some(d) = state.draft() {
        let (x, y) = vp.to_screen(d.latitude, d.longitude);
        draw_marker(ctx, x, y, size, "rgba(255,99,71,0.6)", true);
    }
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let config = use_context::<AppContext>()
        .map(|c| c.config.clone())
        .unwrap_or_else(|| Rc::new(AppConfig::default()));
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let state_ref = use_mut_ref(|| props.state.clone());
    let drag = use_mut_ref(DragState::default);
    let tiles = use_mut_ref(TileCache::new);

    // Effect: refresh handle each version, then redraw
    {
        let state_ref = state_ref.clone();
        let current_handle = props.state.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with(props.state.version, move |_| {
            *state_ref.borrow_mut() = current_handle;
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }
    // Main mount effect (sizing, drawing, events)
    {
        let canvas_ref = canvas_ref.clone();
        let draw_ref = draw_ref.clone();
        let state_ref = state_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>().expect("canvas");
            let fit_canvas = {
                let canvas = canvas.clone();
                let window = window.clone();
                let state_ref = state_ref.clone();
                move || {
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0);
                    canvas.set_width(width.max(0.0) as u32);
                    canvas.set_height(height.max(0.0) as u32);
                    let handle = state_ref.borrow().clone();
                    handle.dispatch(MapAction::Resize { width, height });
                }
            };
            fit_canvas();

            // Shared onload handler for every tile image
            let tile_loaded = {
                let draw_ref = draw_ref.clone();
                Closure::wrap(Box::new(move || {
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                }) as Box<dyn FnMut()>)
            };
            let onload_fn: js_sys::Function = tile_loaded.as_ref().unchecked_ref::<js_sys::Function>().clone();

            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let state_ref = state_ref.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let Some(ctx) = canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                    else {
                        return;
                    };
                    let handle = state_ref.borrow().clone();
                    draw_map(&ctx, &handle, &config, &mut tiles.borrow_mut(), &onload_fn);
                })
            };
            *draw_ref.borrow_mut() = Some(draw_closure.clone());
            draw_closure();

            // Wheel zoom around the cursor
            let wheel_cb = {
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
                    e.prevent_default();
                    let factor = (-e.delta_y() * 0.002).exp();
                    let handle = state_ref.borrow().clone();
                    handle.dispatch(MapAction::ZoomAt {
                        x: e.offset_x() as f64,
                        y: e.offset_y() as f64,
                        factor,
                    });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .ok();
            // Drag to pan
            let mousedown_cb = {
                let drag = drag.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    drag.borrow_mut()
                        .press(e.client_x() as f64, e.client_y() as f64);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let mousemove_cb = {
                let drag = drag.clone();
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let delta = drag
                        .borrow_mut()
                        .drag_to(e.client_x() as f64, e.client_y() as f64);
                    if let Some((dx, dy)) = delta {
                        let handle = state_ref.borrow().clone();
                        handle.dispatch(MapAction::Pan { dx, dy });
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let mouseup_cb = {
                let drag = drag.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    drag.borrow_mut().release();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .ok();
            // Marker click selects and recenters
            let click_cb = {
                let drag = drag.clone();
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if drag.borrow().was_drag() {
                        drag.borrow_mut().record_click(e.detail(), false);
                        return;
                    }
                    let handle = state_ref.borrow().clone();
                    let hit = handle
                        .pin_at(e.offset_x() as f64, e.offset_y() as f64)
                        .map(|p| p.id.clone());
                    drag.borrow_mut().record_click(e.detail(), hit.is_some());
                    if let Some(id) = hit {
                        log::debug!("marker click {id}");
                        handle.dispatch(MapAction::SelectPin(id));
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref())
                .ok();
            // Double-click on empty map opens a draft
            let dblclick_cb = {
                let drag = drag.clone();
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    e.prevent_default();
                    let handle = state_ref.borrow().clone();
                    let (x, y) = (e.offset_x() as f64, e.offset_y() as f64);
                    let marker_clicked = drag.borrow().marker_clicked;
                    let Some((latitude, longitude)) = handle.draft_target(x, y, marker_clicked)
                    else {
                        log::debug!("double-click ignored");
                        return;
                    };
                    handle.dispatch(MapAction::OpenDraft {
                        latitude,
                        longitude,
                    });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("dblclick", dblclick_cb.as_ref().unchecked_ref())
                .ok();
            let contextmenu_cb = {
                Closure::wrap(Box::new(move |e: web_sys::Event| {
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let resize_cb = {
                let fit_canvas = fit_canvas.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    fit_canvas();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();
            // Cleanup
            let window_clone = window.clone();
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "click",
                    click_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "dblclick",
                    dblclick_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                *draw_ref.borrow_mut() = None;
                let _keep_alive = &tile_loaded;
            }
        });
    }

    html! {
        <canvas ref={canvas_ref} id="map-canvas" style="display:block; width:100%; height:100%; cursor:grab;"></canvas>
    }
}
