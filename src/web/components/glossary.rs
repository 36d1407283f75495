//! Glossary screen

use leptos::*;

use crate::web::apiclient;
use crate::web::model::GlossaryView;
use crate::web::state::AppState;

#[component]
pub fn GlossaryPage() -> impl IntoView {
  let state = use_context::<AppState>().expect("AppState not found");
  let glossary = create_rw_signal(GlossaryView::new());

  create_effect(move |_| {
    let state = state.clone();
    spawn_local(async move {
      let result = apiclient::fetch_legal_terms().await;
      if let Some(Some(notice)) = glossary.try_update(|g| g.loaded(result)) {
        state.notify(notice);
      }
    });
  });

  let visible = move || {
    glossary.with(|g| g.visible().into_iter().cloned().collect::<Vec<_>>())
  };

  view! {
    <section class="page">
      <div class="card">
        <div class="card-header">
          <h2 class="card-title">"Glosario de Términos Legales"</h2>
          <p class="card-description">
            "Consulta las definiciones de cláusulas y términos comunes en documentos legales"
          </p>
        </div>
        <div class="card-body">
          <input
            class="search-input"
            type="search"
            placeholder="Buscar término o categoría..."
            prop:value=move || glossary.with(|g| g.search.clone())
            on:input=move |ev| {
              let q = event_target_value(&ev);
              glossary.update(|g| g.search = q);
            }
          />
        </div>
      </div>

      <Show
        when=move || !glossary.with(|g| g.loading())
        fallback=|| view! { <p class="empty-state text-muted">"Cargando términos..."</p> }
      >
        <Show
          when=move || !visible().is_empty()
          fallback=|| view! {
            <div class="card">
              <p class="empty-state text-muted">
                "No se encontraron términos que coincidan con tu búsqueda"
              </p>
            </div>
          }
        >
          <div class="term-grid">
            <For
              each=visible
              key=|t| t.id
              children=|term| view! {
                <article class="card term-card">
                  <div class="term-header">
                    <h3>{term.term}</h3>
                    <span class="badge badge-outline">{term.category}</span>
                  </div>
                  <p class="text-muted">{term.definition}</p>
                </article>
              }
            />
          </div>
        </Show>
      </Show>
    </section>
  }
}
