//! History screen: the user's saved documents

use leptos::*;
use uuid::Uuid;

use crate::web::apiclient;
use crate::web::model::{format_spanish_date, HistoryView};
use crate::web::state::AppState;

fn refresh(view: RwSignal<HistoryView>, state: AppState) {
  let Some(ticket) = view.try_update(|v| v.begin_load()) else {
    return;
  };
  spawn_local(async move {
    let result = apiclient::fetch_documents().await;
    if let Some(Some(notice)) = view.try_update(|v| v.loaded(ticket, result)) {
      state.notify(notice);
    }
  });
}

#[component]
pub fn HistoryPage() -> impl IntoView {
  let state = use_context::<AppState>().expect("AppState not found");
  let history = create_rw_signal(HistoryView::new());

  {
    let state = state.clone();
    create_effect(move |_| refresh(history, state.clone()));
  }

  let on_delete = move |id: Uuid| {
    let state = state.clone();
    spawn_local(async move {
      let result = apiclient::delete_document(id).await;
      let succeeded = result.is_ok();
      if let Some(notice) = history.try_update(|v| v.deleted(id, result)) {
        state.notify(notice);
      }
      if succeeded {
        refresh(history, state);
      }
    });
  };

  view! {
    <section class="page">
      <div class="card">
        <div class="card-header">
          <h2 class="card-title">"Historial de Documentos"</h2>
          <p class="card-description">"Consulta y descarga tus documentos generados"</p>
        </div>
        <div class="card-body">
          <Show
            when=move || !(history.with(|v| v.loading() && v.is_empty()))
            fallback=|| view! { <p class="empty-state text-muted">"Cargando documentos..."</p> }
          >
            <Show
              when=move || !history.with(|v| v.is_empty())
              fallback=|| view! {
                <p class="empty-state text-muted">"No tienes documentos generados todavía"</p>
              }
            >
              <table class="data-table">
                <thead>
                  <tr>
                    <th>"Tipo"</th>
                    <th>"Título"</th>
                    <th>"Fecha de Creación"</th>
                    <th class="text-right">"Acciones"</th>
                  </tr>
                </thead>
                <tbody>
                  <For
                    each=move || history.with(|v| v.rows().to_vec())
                    key=|doc| doc.id
                    children=move |doc| {
                      let on_delete = on_delete.clone();
                      let id = doc.id;
                      view! {
                        <tr>
                          <td><span class="badge">{doc.document_type.short_label()}</span></td>
                          <td class="font-medium">{doc.title.clone()}</td>
                          <td>{format_spanish_date(doc.created_at)}</td>
                          <td class="actions">
                            <button
                              class="btn btn-ghost btn-sm"
                              title="Descarga disponible próximamente"
                              disabled=doc.file_url.is_none()
                            >
                              "Descargar"
                            </button>
                            <button
                              class="btn btn-ghost btn-sm text-danger"
                              on:click=move |_| on_delete(id)
                            >
                              "Eliminar"
                            </button>
                          </td>
                        </tr>
                      }
                    }
                  />
                </tbody>
              </table>
            </Show>
          </Show>
        </div>
      </div>
    </section>
  }
}
