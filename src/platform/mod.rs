//! Host collaborators
//!
//! - `headless`: records every call; drives the native runner and tests
//! - `storage`: LocalStorage JSON values, empty on native
//! - `web`: browser host (fetch, Web Audio, timers), wasm32 only

pub mod headless;
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessHost;
#[cfg(target_arch = "wasm32")]
pub use web::WebHost;
