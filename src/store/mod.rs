//! State containers: the persisted auth session, the modal selection of the
//! CRUD screens and the paginated user list.

pub mod auth;
pub mod crud;
pub mod users;

pub use self::{
    auth::AuthStore,
    crud::{CrudStore, Modal},
    users::UserStore,
};
