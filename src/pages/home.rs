use leptos::ev::{Event, MouseEvent};
use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{FileReader, HtmlInputElement};

use crate::components::force_graph::InteractomeCanvas;
use crate::interactome::{InteractionRecord, ViewerConfig, records_from_file};

const SAMPLE_NAME: &str = "sample_interactions.json";
const SAMPLE_TABLE: &str = include_str!("../../assets/sample_interactions.json");
const VIEWER_CONFIG: &str = include_str!("../../assets/viewer_config.json");

fn viewer_config() -> ViewerConfig {
	ViewerConfig::from_json(VIEWER_CONFIG).unwrap_or_else(|err| {
		warn!("{err}, using defaults");
		ViewerConfig::default()
	})
}

fn load_table(name: &str, text: &str, records: RwSignal<Vec<InteractionRecord>>, status: RwSignal<String>) {
	match records_from_file(name, text) {
		Ok(rows) => {
			info!("loaded {} rows from {name}", rows.len());
			status.set("Building graph...".to_string());
			records.set(rows);
		}
		Err(err) => status.set(format!("Could not read table: {err}")),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let records = RwSignal::new(Vec::<InteractionRecord>::new());
	let status = RwSignal::new("Choose an interaction table to begin.".to_string());
	let details = RwSignal::new(Vec::<(String, String)>::new());

	let on_file = move |ev: Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		let Ok(reader) = FileReader::new() else {
			status.set("This browser cannot read local files.".to_string());
			return;
		};
		let name = file.name();
		status.set(format!("Reading {name}..."));
		let result = reader.clone();
		let onload = Closure::once_into_js(move || match result.result().ok().and_then(|v| v.as_string()) {
			Some(text) => load_table(&name, &text, records, status),
			None => status.set("File is not text.".to_string()),
		});
		reader.set_onload(Some(onload.unchecked_ref()));
		if reader.read_as_text(&file).is_err() {
			status.set("Could not read file.".to_string());
		}
		input.set_value("");
	};

	let load_sample = move |_: MouseEvent| load_table(SAMPLE_NAME, SAMPLE_TABLE, records, status);
	let clear_network = move |_: MouseEvent| {
		records.set(Vec::new());
		status.set("Network cleared.".to_string());
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<InteractomeCanvas
					records=records
					config=viewer_config()
					on_status={move |msg: String| status.set(msg)}
					on_select={move |rows: Vec<(String, String)>| details.set(rows)}
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Interactome Viewer"</h1>
					<p class="subtitle">
						"Click a node to focus its neighbors, double-click to reach further. "
						"Shift adds, alt removes. Space shows everything, ctrl+z goes back."
					</p>
					<div class="controls">
						<input type="file" accept=".json,.csv,application/json,text/csv" on:change=on_file />
						<button on:click=load_sample>"Load sample"</button>
						<button on:click=clear_network>"Clear network"</button>
					</div>
					<p class="status">{move || status.get()}</p>
					<ul class="details">
						{move || {
							details
								.get()
								.into_iter()
								.map(|(key, value)| view! { <li><b>{key}</b>": "{value}</li> })
								.collect_view()
						}}
					</ul>
				</div>
			</div>
		</ErrorBoundary>
	}
}
