pub mod drag;
pub mod viewport;

pub use drag::DragState;
pub use viewport::Viewport;
