use leptos::*;

use crate::web::apiclient;
use crate::web::state::{AppState, Page};

#[component]
pub fn Nav() -> impl IntoView {
  let state = use_context::<AppState>().expect("AppState not found");
  let page = state.page;
  let user = state.user;

  let link = move |target: Page, label: &'static str| {
    let state = use_context::<AppState>().expect("AppState not found");
    view! {
      <button
        class=move || if page.get() == target { "nav-link active" } else { "nav-link" }
        on:click=move |_| state.navigate(target)
      >
        {label}
      </button>
    }
  };

  let on_logout = move |_: ev::MouseEvent| {
    let state = state.clone();
    spawn_local(async move {
      apiclient::logout().await;
      state.signed_out();
    });
  };

  view! {
    <nav class="navbar">
      <span class="brand">"LegalDocs"</span>
      <div class="nav-links">
        {link(Page::Create, "Crear Documento")}
        {link(Page::History, "Historial")}
        {link(Page::Glossary, "Glosario")}
      </div>
      <div class="nav-user">
        <span class="text-muted">{move || user.get().map(|u| u.email).unwrap_or_default()}</span>
        <button class="btn btn-ghost btn-sm" on:click=on_logout>"Cerrar sesión"</button>
      </div>
    </nav>
  }
}
