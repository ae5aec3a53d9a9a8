#![recursion_limit = "256"]

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod app;
pub mod clock;
pub mod content;
pub mod hero;
pub mod media;
pub mod observe;
pub mod outreach;
pub mod pager;
pub mod reveal;
pub mod scene;
pub mod theme;
pub mod timeline;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(App);
}
