//! Quantity net
//!
//! Read-only snapshot of a quantity net, together with its conversion to a Graphviz graph.
pub mod graph;
pub mod io;
pub(crate) mod quantity_net_struct;
pub use quantity_net_struct::*;
