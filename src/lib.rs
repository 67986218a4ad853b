//! Interactive preview sketches for landing-page cards.
//!
//! `core` holds the platform-independent parts (sketch state machines, input
//! dispatch, visibility lifecycle) and builds on any target so it can be tested
//! on the host. Everything that touches the DOM, Canvas 2D or WebAudio is only
//! compiled for `wasm32`.

pub mod constants;
pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
pub mod frame;
#[cfg(target_arch = "wasm32")]
mod observer;

#[cfg(target_arch = "wasm32")]
pub use app::start;
