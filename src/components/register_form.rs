use super::app::AppContext;
use super::login_form::{MODAL_BACKDROP, MODAL_CARD};
use crate::api::RegisterRequest;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum Outcome {
    Idle,
    Pending,
    Success,
    Failure,
}

#[derive(Properties, PartialEq, Clone)]
pub struct RegisterFormProps {
    pub on_close: Callback<()>,
    pub on_show_login: Callback<()>,
}

#[function_component]
pub fn RegisterForm(props: &RegisterFormProps) -> Html {
    let ctx = use_context::<AppContext>();
    let username_ref = use_node_ref();
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let outcome = use_state(|| Outcome::Idle);

    let value_of = |r: &NodeRef| {
        r.cast::<HtmlInputElement>()
            .map(|i| i.value())
            .unwrap_or_default()
    };

    let submit_cb = {
        let username_ref = username_ref.clone();
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        let outcome = outcome.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(ctx) = ctx.clone() else {
                return;
            };
            let body = RegisterRequest {
                username: value_of(&username_ref),
                email: value_of(&email_ref),
                password: value_of(&password_ref),
            };
            let outcome = outcome.clone();
            outcome.set(Outcome::Pending);
            wasm_bindgen_futures::spawn_local(async move {
                match ctx.api.register(&body).await {
                    Ok(()) => {
                        log::info!("registered {}", body.username);
                        outcome.set(Outcome::Success);
                    }
                    Err(err) => {
                        log::warn!("registration failed: {err}");
                        outcome.set(Outcome::Failure);
                    }
                }
            });
        })
    };
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let login_cb = {
        let cb = props.on_show_login.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(())
        })
    };

    let status = match *outcome {
        Outcome::Success => html! {
            <span style="color:green; font-size:12px;">
                {"Successful. You can login now! "}
                <a href="#" onclick={login_cb}>{"Log in"}</a>
            </span>
        },
        Outcome::Failure => html! { <span style="color:red; font-size:12px;">{"Something went wrong!"}</span> },
        Outcome::Idle | Outcome::Pending => html! {},
    };

    html! {<div style={MODAL_BACKDROP}>
        <form onsubmit={submit_cb} style={MODAL_CARD}>
            <h3 style="margin:0; color:slateblue;">{"📍 Register"}</h3>
            <input ref={username_ref} placeholder="username" autofocus=true />
            <input ref={email_ref} type="email" placeholder="email" />
            <input ref={password_ref} type="password" placeholder="password" />
            <button type="submit" disabled={*outcome == Outcome::Pending} style="background:slateblue; color:white; border:none; padding:6px; border-radius:5px;">{"Register"}</button>
            { status }
            <button type="button" onclick={close_cb} style="position:absolute; top:8px; right:10px; border:none; background:none; cursor:pointer;">{"×"}</button>
        </form>
    </div>}
}
