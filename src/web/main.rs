//! LegalDocs web UI - Client-Side Rendered (WASM)

use leptos::*;
use legaldocs::web::components::App;

fn main() {
  console_error_panic_hook::set_once();
  mount_to_body(|| view! { <App/> });
}
