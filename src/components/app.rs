use std::rc::Rc;
use yew::prelude::*;

use super::{
    auth_panel::AuthPanel, draft_popup::DraftPopup, error_banner::ErrorBanner,
    login_form::LoginForm, map_controls::MapControls, map_view::MapView, pin_popup::PinPopup,
    register_form::RegisterForm,
};
use crate::api::PinApi;
use crate::config::AppConfig;
use crate::model::{MapAction, MapState, Overlay, Rating};
use crate::session;

// Shared config and API client, so forms can call the backend without prop drilling
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub api: Rc<PinApi>,
}

#[function_component(App)]
pub fn app() -> Html {
    let ctx = use_memo((), |_| {
        let config = Rc::new(AppConfig::from_build_env());
        log::debug!("api base: {:?}", config.api_base);
        AppContext {
            api: Rc::new(PinApi::new((*config).clone())),
            config,
        }
    });
    let state = use_reducer(|| MapState::new(session::restore()));

    // Load pins once on mount
    {
        let state = state.clone();
        let api = ctx.api.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match api.load_pins().await {
                    Ok(pins) => {
                        log::info!("loaded {} pins", pins.len());
                        state.dispatch(MapAction::PinsLoaded(pins));
                    }
                    Err(err) => {
                        log::error!("loading pins failed: {err}");
                        state.dispatch(MapAction::Failed(err));
                    }
                }
            });
            || ()
        });
    }

    let on_submit = {
        let state = state.clone();
        let api = ctx.api.clone();
        Callback::from(move |()| {
            let Some(draft) = state.draft() else {
                return;
            };
            if draft.submitting {
                return;
            }
            let body = match draft.to_new_pin(state.user.as_deref()) {
                Ok(body) => body,
                Err(err) => {
                    state.dispatch(MapAction::SubmitFailed(err));
                    return;
                }
            };
            state.dispatch(MapAction::SubmitStarted);
            let state = state.clone();
            let api = api.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api.create_pin(&body).await {
                    Ok(pin) => {
                        log::info!("created pin {}", pin.id);
                        state.dispatch(MapAction::PinCreated(pin));
                    }
                    Err(err) => {
                        log::error!("creating pin failed: {err}");
                        state.dispatch(MapAction::SubmitFailed(err));
                    }
                }
            });
        })
    };
    let on_rating = {
        let state = state.clone();
        Callback::from(move |raw: String| match raw.parse::<Rating>() {
            Ok(r) => state.dispatch(MapAction::EditRating(r)),
            Err(err) => state.dispatch(MapAction::Failed(err)),
        })
    };
    let dispatcher = |make: fn(String) -> MapAction| {
        let state = state.clone();
        Callback::from(move |v: String| state.dispatch(make(v)))
    };
    let unit = |action: MapAction| {
        let state = state.clone();
        Callback::from(move |()| state.dispatch(action.clone()))
    };
    let on_logged_in = {
        let state = state.clone();
        Callback::from(move |username: String| {
            if let Err(err) = session::persist(&username) {
                log::warn!("could not persist session: {err}");
            }
            state.dispatch(MapAction::LoggedIn(username));
        })
    };
    let on_logout = {
        let state = state.clone();
        Callback::from(move |()| {
            if let Err(err) = session::forget() {
                log::warn!("could not clear session: {err}");
            }
            state.dispatch(MapAction::LoggedOut);
        })
    };
    let on_pan = {
        let state = state.clone();
        Callback::from(move |(dx, dy): (f64, f64)| state.dispatch(MapAction::Pan { dx, dy }))
    };

    let vp = state.viewport;
    let popup = match &state.overlay {
        Overlay::Viewing(_) => match state.selected_pin() {
            Some(pin) => html! {
                <PinPopup
                    pin={pin.clone()}
                    anchor={vp.to_screen(pin.latitude, pin.longitude)}
                    on_close={unit(MapAction::ClosePopup)}
                />
            },
            None => html! {},
        },
        Overlay::Drafting(draft) => html! {
            <DraftPopup
                draft={draft.clone()}
                anchor={vp.to_screen(draft.latitude, draft.longitude)}
                on_title={dispatcher(MapAction::EditTitle)}
                on_description={dispatcher(MapAction::EditDescription)}
                on_rating={on_rating}
                on_submit={on_submit}
                on_close={unit(MapAction::ClosePopup)}
            />
        },
        Overlay::Login => html! {
            <LoginForm on_success={on_logged_in} on_close={unit(MapAction::ClosePopup)} />
        },
        Overlay::Register => html! {
            <RegisterForm on_close={unit(MapAction::ClosePopup)} on_show_login={unit(MapAction::ShowLogin)} />
        },
        Overlay::None => html! {},
    };

    html! { <ContextProvider<AppContext> context={(*ctx).clone()}>
        <div style="position:relative; width:100vw; height:100vh; overflow:hidden; font-family:sans-serif;">
            <MapView state={state.clone()} />
            { popup }
            <AuthPanel
                user={state.user.clone()}
                on_show_login={unit(MapAction::ShowLogin)}
                on_show_register={unit(MapAction::ShowRegister)}
                on_logout={on_logout}
            />
            <MapControls
                zoom={vp.zoom}
                on_zoom_in={unit(MapAction::ZoomBy(1.0))}
                on_zoom_out={unit(MapAction::ZoomBy(-1.0))}
                on_pan={on_pan}
                on_reset={unit(MapAction::ResetView)}
            />
            <ErrorBanner error={state.error.clone()} on_dismiss={unit(MapAction::DismissError)} />
        </div>
    </ContextProvider<AppContext>> }
}
