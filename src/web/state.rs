//! Global state for the web UI using Leptos signals

use leptos::*;

use super::model::Notice;
use crate::types::User;

/// Screen shown below the navigation bar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
  #[default]
  Create,
  History,
  Glossary,
}

#[derive(Clone, Debug)]
pub struct Toast {
  pub id: u32,
  pub notice: Notice,
}

#[derive(Clone, Copy)]
pub struct AppState {
  pub page: RwSignal<Page>,
  /// Signed-in user; `None` shows the login screen
  pub user: RwSignal<Option<User>>,
  /// Set once the stored session has been checked
  pub session_checked: RwSignal<bool>,
  pub toasts: RwSignal<Vec<Toast>>,
  pub toast_counter: RwSignal<u32>,
}

impl AppState {
  pub fn new() -> Self {
    Self {
      page: create_rw_signal(Page::Create),
      user: create_rw_signal(None),
      session_checked: create_rw_signal(false),
      toasts: create_rw_signal(Vec::new()),
      toast_counter: create_rw_signal(0),
    }
  }

  pub fn notify(&self, notice: Notice) {
    let id = self.toast_counter.get_untracked() + 1;
    self.toast_counter.set(id);
    self.toasts.update(|toasts| toasts.push(Toast { id, notice }));
  }

  pub fn remove_toast(&self, id: u32) {
    self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
  }

  pub fn navigate(&self, page: Page) {
    self.page.set(page);
  }

  pub fn signed_out(&self) {
    self.user.set(None);
    self.page.set(Page::Create);
  }
}

impl Default for AppState {
  fn default() -> Self {
    Self::new()
  }
}
