use super::pin_popup::popup_style;
use crate::model::{DraftPin, Rating};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct DraftPopupProps {
    pub draft: DraftPin,
    pub anchor: (f64, f64),
    pub on_title: Callback<String>,
    pub on_description: Callback<String>,
    /// Raw selector value; validated by the owner.
    pub on_rating: Callback<String>,
    pub on_submit: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn DraftPopup(props: &DraftPopupProps) -> Html {
    let title_cb = {
        let cb = props.on_title.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
                cb.emit(input.value());
            }
        })
    };
    let desc_cb = {
        let cb = props.on_description.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e
                .target()
                .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
            {
                cb.emit(area.value());
            }
        })
    };
    let rating_cb = {
        let cb = props.on_rating.clone();
        Callback::from(move |e: Event| {
            if let Some(sel) = e.target().and_then(|t| t.dyn_into::<HtmlSelectElement>().ok()) {
                cb.emit(sel.value());
            }
        })
    };
    let submit_cb = {
        let cb = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let d = &props.draft;
    let field_style = "width:100%; box-sizing:border-box; margin-bottom:6px; padding:4px; border:none; border-bottom:1px solid #ccc;";
    html! {
        <div style={popup_style(props.anchor)}>
            <button onclick={close_cb} style="position:absolute; top:4px; right:6px; border:none; background:none; cursor:pointer; font-size:14px;">{"×"}</button>
            <form onsubmit={submit_cb} style="display:flex; flex-direction:column; gap:2px;">
                <label style="color:tomato; font-size:12px;">{"Title"}</label>
                <input placeholder="Enter a title" autofocus=true value={d.title.clone()} oninput={title_cb} style={field_style} />
                <label style="color:tomato; font-size:12px;">{"Description"}</label>
                <textarea placeholder="Say us something about this place." value={d.description.clone()} oninput={desc_cb} style={field_style} />
                <label style="color:tomato; font-size:12px;">{"Rating"}</label>
                <select onchange={rating_cb} style={field_style}>
                    { for Rating::all().map(|r| html! {
                        <option value={r.get().to_string()} selected={r == d.rating}>{ r.get() }</option>
                    }) }
                </select>
                <button type="submit" disabled={d.submitting} style="border:none; padding:6px; border-radius:5px; color:white; background:tomato; cursor:pointer; margin-top:4px;">
                    { if d.submitting { "Adding..." } else { "Add Pin" } }
                </button>
            </form>
        </div>
    }
}
