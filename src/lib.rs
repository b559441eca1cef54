//! Protein interaction network viewer.
//!
//! [`interactome`] holds the graph model, table ingestion, clustering and
//! focus navigation and builds on any target. The Leptos components and
//! pages render it on a canvas in the browser.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
pub mod interactome;
mod pages;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
///
/// Debug builds log at debug level so ingestion and focus changes show up in
/// the console; release builds keep to info.
pub fn init_logging() {
	let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {level}");
}

/// Router for the viewer page; anything else is a 404.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Interactome Viewer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="description" content="Explore protein bait/prey interaction networks" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
