use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct AuthPanelProps {
    pub user: Option<String>,
    pub on_show_login: Callback<()>,
    pub on_show_register: Callback<()>,
    pub on_logout: Callback<()>,
}

#[function_component]
pub fn AuthPanel(props: &AuthPanelProps) -> Html {
    let button_style = "border:none; padding:6px 12px; border-radius:5px; color:white; cursor:pointer; margin-left:8px;";
    if let Some(user) = &props.user {
        let logout_cb = {
            let cb = props.on_logout.clone();
            Callback::from(move |_| cb.emit(()))
        };
        return html! {<div style="position:absolute; top:12px; right:12px; display:flex; align-items:center;">
            <span style="background:rgba(255,255,255,0.9); padding:4px 8px; border-radius:5px; font-size:13px;">{ user.clone() }</span>
            <button onclick={logout_cb} style={format!("{} background:tomato;", button_style)}>{"Log out"}</button>
        </div>};
    }
    let login_cb = {
        let cb = props.on_show_login.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let register_cb = {
        let cb = props.on_show_register.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="position:absolute; top:12px; right:12px; display:flex;">
        <button onclick={login_cb} style={format!("{} background:teal;", button_style)}>{"Log in"}</button>
        <button onclick={register_cb} style={format!("{} background:slateblue;", button_style)}>{"Register"}</button>
    </div>}
}
