use super::app::AppContext;
use crate::api::LoginRequest;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LoginFormProps {
    /// Called with the username the server confirmed.
    pub on_success: Callback<String>,
    pub on_close: Callback<()>,
}

pub const MODAL_BACKDROP: &str = "position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.35); z-index:50;";
pub const MODAL_CARD: &str = "position:relative; background:#fff; color:#222; border-radius:12px; padding:20px 24px; width:300px; display:flex; flex-direction:column; gap:10px;";

#[function_component]
pub fn LoginForm(props: &LoginFormProps) -> Html {
    let ctx = use_context::<AppContext>();
    let username_ref = use_node_ref();
    let password_ref = use_node_ref();
    let failure = use_state(|| false);
    let pending = use_state(|| false);

    let submit_cb = {
        let username_ref = username_ref.clone();
        let password_ref = password_ref.clone();
        let failure = failure.clone();
        let pending = pending.clone();
        let on_success = props.on_success.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(ctx) = ctx.clone() else {
                return;
            };
            let body = LoginRequest {
                username: username_ref
                    .cast::<HtmlInputElement>()
                    .map(|i| i.value())
                    .unwrap_or_default(),
                password: password_ref
                    .cast::<HtmlInputElement>()
                    .map(|i| i.value())
                    .unwrap_or_default(),
            };
            let failure = failure.clone();
            let pending = pending.clone();
            let on_success = on_success.clone();
            pending.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match ctx.api.login(&body).await {
                    Ok(user) => {
                        log::info!("logged in as {}", user.username);
                        failure.set(false);
                        on_success.emit(user.username);
                    }
                    Err(err) => {
                        log::warn!("login failed: {err}");
                        failure.set(true);
                    }
                }
                pending.set(false);
            });
        })
    };
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {<div style={MODAL_BACKDROP}>
        <form onsubmit={submit_cb} style={MODAL_CARD}>
            <h3 style="margin:0; color:slateblue;">{"📍 Log in"}</h3>
            <input ref={username_ref} placeholder="username" autofocus=true />
            <input ref={password_ref} type="password" placeholder="password" />
            <button type="submit" disabled={*pending} style="background:slateblue; color:white; border:none; padding:6px; border-radius:5px;">{"Login"}</button>
            { if *failure { html!{ <span style="color:red; font-size:12px;">{"Something went wrong!"}</span> } } else { html!{} } }
            <button type="button" onclick={close_cb} style="position:absolute; top:8px; right:10px; border:none; background:none; cursor:pointer;">{"×"}</button>
        </form>
    </div>}
}
