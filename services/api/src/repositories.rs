//! Repositories for database operations

pub mod redirect;

pub use redirect::{RedirectRepository, RedirectStore};
