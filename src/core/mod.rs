//! Core domain types

pub mod embedding;
pub mod media;
pub mod object;
pub mod similarity;

pub use embedding::Embedding;
pub use media::MediaType;
pub use object::{ImageContent, Object, ObjectKind};
pub use similarity::similarity;
