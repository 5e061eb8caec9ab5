//! Class inheritance graph with flattened member tables.

pub mod class_graph;

pub use class_graph::{ClassGraph, ClassGraphBuilder, ClassNode, FlatMember, ResolutionState};

#[cfg(test)]
mod tests;
