//! Modal and selection state for the user CRUD screens. At most one modal is
//! open at a time; opening one closes the others.

use crate::api::types::User;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    Create,
    Edit,
    View,
    Delete,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrudStore {
    modal: Option<Modal>,
    pub selected_user: Option<User>,
    pub user_to_delete: Option<User>,
}

impl CrudStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn open_modal(&self) -> Option<Modal> {
        self.modal
    }

    #[must_use]
    pub fn is_open(&self, modal: Modal) -> bool {
        self.modal == Some(modal)
    }

    pub fn set_selected_user(&mut self, user: Option<User>) {
        self.selected_user = user;
    }

    pub fn set_user_to_delete(&mut self, user: Option<User>) {
        self.user_to_delete = user;
    }

    pub fn open_create_modal(&mut self) {
        self.modal = Some(Modal::Create);
        self.selected_user = None;
    }

    pub fn open_edit_modal(&mut self, user: User) {
        self.modal = Some(Modal::Edit);
        self.selected_user = Some(user);
    }

    pub fn open_view_modal(&mut self, user: User) {
        self.modal = Some(Modal::View);
        self.selected_user = Some(user);
    }

    pub fn open_delete_modal(&mut self, user: User) {
        self.modal = Some(Modal::Delete);
        self.selected_user = None;
        self.user_to_delete = Some(user);
    }

    pub fn close_all_modals(&mut self) {
        self.modal = None;
        self.selected_user = None;
        self.user_to_delete = None;
    }
}
