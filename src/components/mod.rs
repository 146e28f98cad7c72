pub mod app;
pub mod auth_panel;
pub mod draft_popup;
pub mod error_banner;
pub mod login_form;
pub mod map_controls;
pub mod map_view;
pub mod pin_popup;
pub mod register_form;
