pub mod canonical;
pub mod context;
pub mod diffusion;
pub mod store;

pub use context::GraphContext;
pub use store::LexicalGraph;
