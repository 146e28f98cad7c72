use crate::model::Pin;
use crate::util::{format_ago, parse_timestamp_ms, stars};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PinPopupProps {
    pub pin: Pin,
    /// Screen position of the pin; the card opens to its right.
    pub anchor: (f64, f64),
    pub on_close: Callback<()>,
}

pub fn popup_style(anchor: (f64, f64)) -> String {
    format!(
        "position:absolute; left:{:.0}px; top:{:.0}px; transform:translateY(-50%); \
         background:#fff; color:#222; border-radius:6px; box-shadow:0 2px 10px rgba(0,0,0,0.3); \
         padding:10px 14px; min-width:220px; max-width:260px; font-size:13px; z-index:10;",
        anchor.0 + 10.0,
        anchor.1
    )
}

#[function_component]
pub fn PinPopup(props: &PinPopupProps) -> Html {
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let p = &props.pin;
    let label_style = "display:block; color:tomato; font-size:12px; border-bottom:0.5px solid tomato; margin:8px 0 3px 0; width:max-content;";
    let age = p
        .created_at
        .as_deref()
        .and_then(parse_timestamp_ms)
        .map(|then| format_ago(then, js_sys::Date::now()));
    html! {
        <div style={popup_style(props.anchor)}>
            <button onclick={close_cb} style="position:absolute; top:4px; right:6px; border:none; background:none; cursor:pointer; font-size:14px;">{"×"}</button>
            <label style={label_style}>{"Place"}</label>
            <h4 style="margin:0; font-size:16px;">{ p.title.clone() }</h4>
            <label style={label_style}>{"Review"}</label>
            <p style="margin:0; font-size:13px;">{ p.description.clone() }</p>
            <label style={label_style}>{"Rating"}</label>
            <div style="color:gold; font-size:16px;">{ stars(p.rating.get()) }</div>
            <label style={label_style}>{"Information"}</label>
            <span style="display:block; font-size:13px;">{"Created by "}<b>{ p.username.clone() }</b></span>
            { if let Some(age) = age { html!{ <span style="font-size:11px; opacity:0.7;">{ age }</span> } } else { html!{} } }
        </div>
    }
}
