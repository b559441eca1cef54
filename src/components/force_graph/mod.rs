mod component;
mod render;
mod session;
mod state;
mod types;

pub use component::InteractomeCanvas;
