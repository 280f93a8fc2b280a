#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// Quantity nets and their export to Graphviz graphs
///
pub mod core;

#[cfg(test)]
mod utils;

#[doc(inline)]
pub use crate::core::process_models::quantity_net::QuantityNet;

#[doc(inline)]
pub use crate::core::process_models::quantity_net::{
    Arc, CollectionPoint, Marking, ObjectArc, ObjectPlace, ObjectType, QuantityArc, Transition,
};

#[doc(inline)]
pub use crate::core::process_models::quantity_net::graph::{
    ColorAssigner, ConfigurationError, ExportError, ExportFormat, GraphBuilder, GraphDescriptor,
    GraphOptions, QuantityGraphError,
};

#[doc(inline)]
pub use crate::core::process_models::quantity_net::io::QuantityNetIOError;

///
/// Serialize a [`QuantityNet`] as a JSON [`String`]
///
pub fn quantity_net_to_json(net: &QuantityNet) -> Result<String, serde_json::Error> {
    serde_json::to_string(net)
}

///
/// Deserialize a [`QuantityNet`] from a JSON [`String`]
///
pub fn json_to_quantity_net(net_json: &str) -> Result<QuantityNet, serde_json::Error> {
    serde_json::from_str(net_json)
}

///
/// Build the graph of a [`QuantityNet`] and return its DOT source
///
/// See [`GraphBuilder`] and [`GraphDescriptor::get_text`].
pub fn quantity_net_to_dot(
    net: &QuantityNet,
    marked: bool,
    options: GraphOptions,
) -> Result<String, ExportError> {
    let mut graph = GraphBuilder::new(options).build(net, marked)?;
    graph.create_graph();
    Ok(graph.get_text()?)
}
