use leptos::prelude::*;

use crate::cards::Card;

/// Label of the button that re-centers the graph on the shown card.
const RECENTER_LABEL: &str = "Recenter here";

fn phrasing_list(title: &'static str, items: Vec<String>) -> impl IntoView {
	(!items.is_empty()).then(|| {
		view! {
			<h4>{title}</h4>
			<ul class="phrasings">
				{items.into_iter().map(|p| view! { <li>{p}</li> }).collect_view()}
			</ul>
		}
	})
}

/// Side panel for the card picked in the graph.
#[component]
pub fn CardDetail(
	#[prop(into)] card: Signal<Option<Card>>,
	/// Called with the card id when the user wants to re-center on it.
	#[prop(into)]
	on_recenter: Callback<String>,
) -> impl IntoView {
	move || {
		card.get().map(|card| {
			let id = card.id.clone();
			view! {
				<aside class="card-detail">
					<h2>{card.name}</h2>
					<p class="card-meta">
						<span class="tier">{card.tier}</span>
						" · "
						<span class="leverage">{card.leverage_type}</span>
						" · "
						<span class="intent">{card.intent}</span>
					</p>
					<p>{card.summary}</p>
					<ol class="steps">
						{card.steps.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
					</ol>
					{phrasing_list("Direct", card.direct_phrasings)}
					{phrasing_list("Inception", card.inception_phrasings)}
					<button on:click=move |_| on_recenter.run(id.clone())>{RECENTER_LABEL}</button>
				</aside>
			}
		})
	}
}
