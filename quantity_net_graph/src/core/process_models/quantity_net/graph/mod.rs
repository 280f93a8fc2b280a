//! Drawing a [`QuantityNet`](super::QuantityNet) with Graphviz
//!
//! The snapshot is turned into node/edge descriptors by the [`GraphBuilder`],
//! projected to Graphviz attributes and assembled into a directed graph, which can
//! then be exported as SVG, PNG or DOT.
//!
//! Rendering images requires an active graphviz installation in the PATH.
//! See also <https://github.com/besok/graphviz-rust?tab=readme-ov-file#caveats> and <https://graphviz.org/download/>

/// Projection of descriptors to Graphviz attributes
pub mod attributes;
/// Object type colors
pub mod color_scheme;
/// Visual descriptors of nodes and edges
pub mod descriptors;
/// Building descriptors from a snapshot
pub mod graph_builder;
/// Export to images (SVG, PNG) and DOT
pub mod image_export;
/// Drawing options
pub mod options;
/// [`GraphDescriptor`] struct
pub mod quantity_graph;

pub use color_scheme::{ColorAssigner, ColorScheme, PaletteExhaustedError};
pub use descriptors::{EdgeDescriptor, NodeDescriptor};
pub use graph_builder::{DuplicateIdError, GraphBuilder, QuantityGraphError};
pub use image_export::{ConfigurationError, ExportError, ExportFormat};
pub use options::{GraphOptions, RankDirection};
pub use quantity_graph::{GraphDescriptor, GraphHandle};
