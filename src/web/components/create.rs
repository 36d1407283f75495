//! Create screen: pick a template and fill in its form

use leptos::*;

use crate::forms::{FieldDescriptor, InputKind};
use crate::types::DocumentType;
use crate::web::apiclient;
use crate::web::model::CreateForm;
use crate::web::state::AppState;

#[component]
pub fn CreatePage() -> impl IntoView {
  let state = use_context::<AppState>().expect("AppState not found");
  let form = create_rw_signal(CreateForm::new());

  let on_type_change = move |ev: ev::Event| {
    let value = event_target_value(&ev);
    form.update(|f| f.select_type(value.parse::<DocumentType>().ok()));
  };

  let on_submit = move |_: ev::MouseEvent| {
    let Some(attempt) = form.try_update(|f| f.begin_submit()) else {
      return;
    };
    let req = match attempt {
      Ok(req) => req,
      Err(notice) => {
        state.notify(notice);
        return;
      }
    };
    let state = state.clone();
    spawn_local(async move {
      let result = apiclient::create_document(&req).await.map(|_| ());
      if let Some(notice) = form.try_update(|f| f.finish_submit(result)) {
        state.notify(notice);
      }
    });
  };

  view! {
    <section class="page">
      <div class="card">
        <div class="card-header">
          <h2 class="card-title">"Crear Documento Legal"</h2>
          <p class="card-description">"Completa el formulario para generar tu documento automáticamente"</p>
        </div>
        <div class="card-body form">
          <label for="documentType">"Tipo de Documento"</label>
          <select
            id="documentType"
            on:change=on_type_change
            prop:value=move || form.with(|f| f.selected().map(|t| t.as_str()).unwrap_or(""))
          >
            <option value="" disabled=true>"Selecciona un tipo de documento"</option>
            {DocumentType::ALL
              .iter()
              .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
              .collect_view()}
          </select>

          <Show when=move || form.with(|f| f.selected().is_some())>
            <div class="form-fields">
              {move || {
                form
                  .with(|f| f.visible_fields())
                  .iter()
                  .map(|field| view! { <FieldInput field=field form=form/> })
                  .collect_view()
              }}
              <button
                class="btn btn-primary btn-block"
                disabled=move || form.with(|f| f.loading())
                on:click=on_submit.clone()
              >
                {move || if form.with(|f| f.loading()) { "Generando documento..." } else { "Generar PDF" }}
              </button>
            </div>
          </Show>
        </div>
      </div>
    </section>
  }
}

#[component]
fn FieldInput(field: &'static FieldDescriptor, form: RwSignal<CreateForm>) -> impl IntoView {
  let name = field.name;
  let value = move || form.with(|f| f.value(name).to_string());
  let on_input = move |ev: ev::Event| form.update(|f| f.set_value(name, &event_target_value(&ev)));

  let input = match field.kind {
    InputKind::Textarea => view! {
      <textarea id=name rows=4 required=field.required prop:value=value on:input=on_input></textarea>
    }
    .into_view(),
    kind => view! {
      <input
        id=name
        type=kind.html_type()
        required=field.required
        prop:value=value
        on:input=on_input
      />
    }
    .into_view(),
  };

  view! {
    <div class="form-field">
      <label for=name>
        {field.label}
        {field.required.then(|| view! { <span class="required">"*"</span> })}
      </label>
      {input}
    </div>
  }
}
