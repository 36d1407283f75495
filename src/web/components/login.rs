//! Sign-in and sign-up screen

use leptos::*;

use crate::web::apiclient;
use crate::web::model::Notice;
use crate::web::state::AppState;

#[component]
pub fn LoginPage() -> impl IntoView {
  let state = use_context::<AppState>().expect("AppState not found");

  let email = create_rw_signal(String::new());
  let password = create_rw_signal(String::new());
  let signing_up = create_rw_signal(false);
  let busy = create_rw_signal(false);

  let on_submit = move |ev: ev::SubmitEvent| {
    ev.prevent_default();
    if busy.get_untracked() {
      return;
    }
    busy.set(true);
    let state = state.clone();
    let (email, password) = (email.get_untracked(), password.get_untracked());
    let signup = signing_up.get_untracked();
    spawn_local(async move {
      let result = if signup {
        apiclient::signup(&email, &password).await
      } else {
        apiclient::login(&email, &password).await
      };
      match result {
        Ok(session) => state.user.set(Some(session.user)),
        Err(e) => state.notify(Notice::error(&e, "No se pudo iniciar sesión")),
      }
      busy.set(false);
    });
  };

  view! {
    <div class="auth-container">
      <div class="card">
        <h1 class="card-title">"LegalDocs"</h1>
        <p class="card-description">
          {move || if signing_up.get() { "Crea tu cuenta" } else { "Inicia sesión para continuar" }}
        </p>
        <form class="form" on:submit=on_submit>
          <label for="email">"Correo electrónico"</label>
          <input
            id="email"
            type="email"
            required=true
            prop:value=move || email.get()
            on:input=move |ev| email.set(event_target_value(&ev))
          />
          <label for="password">"Contraseña"</label>
          <input
            id="password"
            type="password"
            required=true
            prop:value=move || password.get()
            on:input=move |ev| password.set(event_target_value(&ev))
          />
          <button class="btn btn-primary btn-block" type="submit" disabled=move || busy.get()>
            {move || match (busy.get(), signing_up.get()) {
              (true, _) => "Procesando...",
              (false, true) => "Crear cuenta",
              (false, false) => "Iniciar sesión",
            }}
          </button>
        </form>
        <button class="btn btn-ghost btn-block" on:click=move |_| signing_up.update(|s| *s = !*s)>
          {move || if signing_up.get() {
            "¿Ya tienes cuenta? Inicia sesión"
          } else {
            "¿No tienes cuenta? Regístrate"
          }}
        </button>
      </div>
    </div>
  }
}
