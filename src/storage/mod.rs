//! Object storage: the per-directory index and transfers between indexes

pub mod database;
pub mod transfer;

pub use database::ObjectDatabase;
pub use transfer::{transfer_object, unique_destination};
