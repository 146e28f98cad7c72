use crate::error::AppError;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ErrorBannerProps {
    pub error: Option<AppError>,
    pub on_dismiss: Callback<()>,
}

#[function_component]
pub fn ErrorBanner(props: &ErrorBannerProps) -> Html {
    let Some(err) = &props.error else {
        return html! {};
    };
    let dismiss_cb = {
        let cb = props.on_dismiss.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:12px; left:50%; transform:translateX(-50%); background:#fdecea; color:#611a15; border:1px solid #f5c6cb; border-radius:8px; padding:8px 12px; display:flex; gap:12px; align-items:center; font-size:13px; z-index:30;">
            <span>{ err.to_string() }</span>
            <button onclick={dismiss_cb} style="padding:2px 8px;">{"Dismiss"}</button>
        </div>
    }
}
