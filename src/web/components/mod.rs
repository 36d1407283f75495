//! Web UI components

use leptos::*;

use crate::web::apiclient;
use crate::web::state::{AppState, Page};

mod create;
mod glossary;
mod history;
mod login;
mod nav;
mod toast;

pub use create::CreatePage;
pub use glossary::GlossaryPage;
pub use history::HistoryPage;
pub use login::LoginPage;
pub use nav::Nav;
pub use toast::ToastContainer;

#[component]
pub fn App() -> impl IntoView {
  let state = AppState::new();
  provide_context(state.clone());

  // Resume a stored session, if it is still valid
  {
    let state = state.clone();
    create_effect(move |_| {
      let state = state.clone();
      spawn_local(async move {
        if apiclient::get_stored_token().is_some() {
          match apiclient::current_user().await {
            Ok(user) => state.user.set(Some(user)),
            Err(_) => apiclient::clear_stored_token(),
          }
        }
        state.session_checked.set(true);
      });
    });
  }

  let page = state.page;
  let user = state.user;
  let checked = state.session_checked;

  view! {
    <div class="app-container">
      <Show
        when=move || checked.get()
        fallback=|| view! { <p class="empty-state text-muted">"Cargando..."</p> }
      >
        <Show when=move || user.with(Option::is_some) fallback=|| view! { <LoginPage/> }>
          <Nav/>
          <main class="content">
            {move || match page.get() {
              Page::Create => view! { <CreatePage/> }.into_view(),
              Page::History => view! { <HistoryPage/> }.into_view(),
              Page::Glossary => view! { <GlossaryPage/> }.into_view(),
            }}
          </main>
        </Show>
      </Show>
      <ToastContainer/>
    </div>
  }
}
