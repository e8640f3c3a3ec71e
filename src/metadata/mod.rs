pub mod fallback;
pub mod labels;
pub mod store;

pub use store::{MetadataSnapshot, MetadataStore};
