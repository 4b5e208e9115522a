use leptos::prelude::*;

use crate::cards::{Card, DEFAULT_MAX_DEPTH, sample_deck};
use crate::components::card_detail::CardDetail;
use crate::components::force_graph::{CardGraphCanvas, GraphSettings};

/// Deepest BFS the depth slider offers.
const MAX_DEPTH_CHOICE: usize = 5;

/// Controls, graph and detail panel over an already-loaded deck.
#[component]
fn CardNetwork(cards: Vec<Card>) -> impl IntoView {
	let first = cards.first().map(|c| c.id.clone()).unwrap_or_default();
	let center = RwSignal::new(first);
	let depth = RwSignal::new(DEFAULT_MAX_DEPTH);
	let search = RwSignal::new(String::new());
	let selected = RwSignal::new(None::<Card>);

	let options = cards
		.iter()
		.map(|c| {
			let (id, value) = (c.id.clone(), c.id.clone());
			view! { <option value=value selected=move || center.get() == id>{c.name.clone()}</option> }
		})
		.collect_view();
	let cards = Signal::stored(cards);

	view! {
		<div class="fullscreen-graph">
			<CardGraphCanvas
				cards=cards
				center_id=center
				max_depth=depth
				search=search
				on_select=move |card: Card| selected.set(Some(card))
				settings=GraphSettings::bundled()
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Card Network"</h1>
				<p class="subtitle">"Drag nodes to loosen the layout. Click a card for details. Scroll to zoom."</p>
				<label>
					"Center "
					<select on:change=move |ev| {
						selected.set(None);
						center.set(event_target_value(&ev));
					}>{options}</select>
				</label>
				<label>
					"Depth "
					<input
						type="range"
						min="1"
						max=MAX_DEPTH_CHOICE.to_string()
						prop:value=move || depth.get().to_string()
						on:input=move |ev| {
							depth.set(event_target_value(&ev).parse().unwrap_or(DEFAULT_MAX_DEPTH))
						}
					/>
					{move || depth.get()}
				</label>
				<input
					type="search"
					placeholder="Filter by name, tier or leverage"
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
			</div>
			<CardDetail
				card=selected
				on_recenter=move |id: String| {
					selected.set(None);
					center.set(id);
				}
			/>
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
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
			{move || sample_deck().map(|cards| view! { <CardNetwork cards /> })}
		</ErrorBoundary>
	}
}
