use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct MapControlsProps {
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    /// Screen-pixel pan delta; content moves with the arrow.
    pub on_pan: Callback<(f64, f64)>,
    pub on_reset: Callback<()>,
    pub zoom: f64,
}

#[function_component(MapControls)]
pub fn map_controls(props: &MapControlsProps) -> Html {
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let pan = |dx: f64, dy: f64| {
        let cb = props.on_pan.clone();
        Callback::from(move |_| cb.emit((dx, dy)))
    };
    let reset = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="position:absolute; left:12px; bottom:12px; background:rgba(255,255,255,0.92); border:1px solid #c7c7c7; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        <button onclick={zo}> {"-"} </button>
        <button onclick={zi}> {"+"} </button>
        <span style="font-size:11px; min-width:44px; text-align:center; font-variant-numeric:tabular-nums;">{ format!("z {:.1}", props.zoom) }</span>
        <button onclick={pan(128.0, 0.0)}> {"←"} </button>
        <button onclick={pan(0.0, 128.0)}> {"↑"} </button>
        <button onclick={pan(0.0, -128.0)}> {"↓"} </button>
        <button onclick={pan(-128.0, 0.0)}> {"→"} </button>
        <span style="width:8px;"></span>
        <button onclick={reset}> {"Reset"} </button>
    </div>}
}
