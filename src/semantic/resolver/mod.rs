//! Name resolution over the path index.

pub mod context;
pub mod name_resolver;

pub use context::ResolutionContext;
pub use name_resolver::{Resolution, Resolver};
