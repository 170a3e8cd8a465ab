// User accounts: a document-store collaborator behind the `UserStore` trait.

pub mod handlers;
pub mod store;
