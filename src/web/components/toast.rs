//! Toast notifications

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::web::model::NoticeVariant;
use crate::web::state::AppState;

const TOAST_MS: u32 = 5000;

#[component]
pub fn ToastContainer() -> impl IntoView {
  let state = use_context::<AppState>().expect("AppState not found");
  let toasts = state.toasts;

  view! {
    <div class="toast-container">
      <For
        each=move || toasts.get()
        key=|t| t.id
        children=move |toast| {
          let state = use_context::<AppState>().expect("AppState not found");
          let id = toast.id;

          let state_timeout = state.clone();
          Timeout::new(TOAST_MS, move || state_timeout.remove_toast(id)).forget();

          let class = match toast.notice.variant {
            NoticeVariant::Default => "toast",
            NoticeVariant::Destructive => "toast destructive",
          };
          view! {
            <div class=class role="status">
              <div class="toast-body">
                <strong class="toast-title">{toast.notice.title.clone()}</strong>
                <p class="toast-description">{toast.notice.description.clone()}</p>
              </div>
              <button class="toast-close" title="Cerrar" on:click=move |_| state.remove_toast(id)>
                "×"
              </button>
            </div>
          }
        }
      />
    </div>
  }
}
