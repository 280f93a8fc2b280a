use std::{
    fmt::Display,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use graphviz_rust::{
    cmd::Format,
    dot_generator::{attr, id, stmt},
    dot_structures::*,
    printer::{DotPrinter, PrinterContext},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    attributes::{project, quoted_id, to_graphviz_attributes},
    graph_builder::QuantityGraphError,
    quantity_graph::{GraphDescriptor, GraphHandle},
};
use crate::core::process_models::quantity_net::QuantityNet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Output format of [`GraphDescriptor::export`]
pub enum ExportFormat {
    /// SVG image
    Svg,
    /// PNG image
    Png,
    /// DOT source (with layout positions)
    Dot,
}

impl ExportFormat {
    /// Canonical file extension (without leading dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Dot => "dot",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "dot" => Ok(ExportFormat::Dot),
            _ => Err(ConfigurationError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl From<ExportFormat> for Format {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Svg => Format::Svg,
            ExportFormat::Png => Format::Png,
            ExportFormat::Dot => Format::Dot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Export or serialization requested without a usable graph
pub enum ConfigurationError {
    /// No graph was built yet
    #[error("no graph configured: the graph has not been built yet")]
    NotBuilt,
    /// The graph has no nodes
    #[error("no graph configured: the quantity net has nothing to draw")]
    EmptyGraph,
    /// Unknown export format
    #[error("unsupported export format `{0}` (expected svg, png or dot)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
/// Error while exporting a [`GraphDescriptor`]
pub enum ExportError {
    /// No graph could be built
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Graphviz failed to render
    #[error("failed to render {format} output with graphviz")]
    Render {
        /// Requested format
        format: ExportFormat,
        /// Underlying error (e.g., graphviz not installed)
        #[source]
        source: std::io::Error,
    },
    /// Writing the rendered output failed
    #[error("failed to write {}", .path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Building the descriptors failed
    #[error(transparent)]
    Build(#[from] QuantityGraphError),
}

///
/// Append the canonical extension of `format` to `path`, unless it already ends with it
///
/// The extension check is case-insensitive. Other extensions are kept, e.g. `net.png` exported as SVG
/// becomes `net.png.svg`.
pub fn normalize_export_path<P: AsRef<Path>>(path: P, format: ExportFormat) -> PathBuf {
    let path = path.as_ref();
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(format.extension()));
    if has_extension {
        path.to_path_buf()
    } else {
        let mut file_name = path.as_os_str().to_owned();
        file_name.push(".");
        file_name.push(format.extension());
        PathBuf::from(file_name)
    }
}

fn node_id(name: &str) -> NodeId {
    NodeId(quoted_id(name), None)
}

impl GraphDescriptor {
    fn graph_statements(&self) -> Vec<Stmt> {
        let rank_direction = self.options.rank_direction.as_str();
        let seed = self.options.seed;
        let ratio = self.options.ratio;
        vec![
            stmt!(attr!("rankdir", rank_direction)),
            stmt!(attr!("seed", seed)),
            stmt!(attr!("ratio", ratio)),
        ]
    }

    ///
    /// (Re-)build the Graphviz graph
    ///
    /// Any previously built graph is discarded first. All nodes are added before the edges.
    pub fn create_graph(&mut self) {
        self.clear_graph();

        let node_stmts = self.nodes.iter().map(|node| {
            Stmt::Node(Node::new(
                node_id(node.id()),
                to_graphviz_attributes(&project(node)),
            ))
        });
        let edge_stmts = self.edges.iter().map(|edge| {
            Stmt::Edge(Edge {
                ty: EdgeTy::Pair(
                    Vertex::N(node_id(edge.source())),
                    Vertex::N(node_id(edge.target())),
                ),
                attributes: to_graphviz_attributes(&project(edge)),
            })
        });
        let stmts: Vec<Stmt> = self
            .graph_statements()
            .into_iter()
            .chain(node_stmts)
            .chain(edge_stmts)
            .collect();

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "created quantity net graph"
        );
        self.handle = GraphHandle::Built(Graph::DiGraph {
            id: quoted_id(&self.options.graph_name),
            strict: false,
            stmts,
        });
    }

    fn built_graph(&self) -> Result<&Graph, ConfigurationError> {
        match &self.handle {
            GraphHandle::Empty => Err(ConfigurationError::NotBuilt),
            GraphHandle::Built(_) if self.nodes.is_empty() => Err(ConfigurationError::EmptyGraph),
            GraphHandle::Built(g) => Ok(g),
        }
    }

    ///
    /// DOT source of the built graph
    ///
    /// Fails if [`GraphDescriptor::create_graph`] (or an export) was not called before.
    pub fn get_text(&self) -> Result<String, ConfigurationError> {
        Ok(self.built_graph()?.print(&mut PrinterContext::default()))
    }

    ///
    /// Export the graph to a file
    ///
    /// Builds the graph if necessary. If `path` does not end with the extension of `format`, it is appended.
    /// Returns the path of the written file.
    ///
    /// Requires an active graphviz installation in the PATH.
    /// See also <https://github.com/besok/graphviz-rust?tab=readme-ov-file#caveats> and <https://graphviz.org/download/>
    pub fn export<P: AsRef<Path>>(&mut self, path: P, format: ExportFormat) -> Result<PathBuf, ExportError> {
        if !self.is_built() {
            self.create_graph();
        }
        let mut g = self.built_graph()?.clone();
        if let (ExportFormat::Png, Some(dpi_fac)) = (format, self.options.png_dpi_factor) {
            if let Graph::DiGraph { stmts, .. } = &mut g {
                stmts.insert(0, stmt!(attr!("dpi", (dpi_fac * 96.0))));
            }
        }

        let path = normalize_export_path(path, format);
        let out = graphviz_rust::exec(g, &mut PrinterContext::default(), vec![Format::from(format).into()])
            .map_err(|source| ExportError::Render { format, source })?;

        let mut f = File::create(&path).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        f.write_all(&out).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), %format, "exported quantity net graph");
        Ok(path)
    }

    ///
    /// Export the graph into `directory`, naming the file after the graph
    ///
    /// See [`GraphDescriptor::export`].
    pub fn export_to_dir<P: AsRef<Path>>(&mut self, directory: P, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let path = directory.as_ref().join(&self.options.graph_name);
        self.export(path, format)
    }

    /// Export the graph as a SVG file
    pub fn export_svg<P: AsRef<Path>>(&mut self, path: P) -> Result<PathBuf, ExportError> {
        self.export(path, ExportFormat::Svg)
    }

    /// Export the graph as a PNG file
    pub fn export_png<P: AsRef<Path>>(&mut self, path: P) -> Result<PathBuf, ExportError> {
        self.export(path, ExportFormat::Png)
    }

    /// Export the graph as a DOT file (with layout positions computed by graphviz)
    pub fn export_dot<P: AsRef<Path>>(&mut self, path: P) -> Result<PathBuf, ExportError> {
        self.export(path, ExportFormat::Dot)
    }
}

impl QuantityNet {
    /// Export the quantity net as a SVG image (using the default options)
    ///
    /// _Note_: This is an export method for __visualizing__ the net.
    /// The resulting SVG file cannot be imported as a quantity net again (for that functionality, see [`QuantityNet::export_json`]).
    pub fn export_svg<P: AsRef<Path>>(&self, path: P, marked: bool) -> Result<PathBuf, ExportError> {
        self.to_graph(marked)?.export_svg(path)
    }

    /// Export the quantity net as a PNG image (using the default options)
    ///
    /// _Note_: This is an export method for __visualizing__ the net.
    /// The resulting PNG file cannot be imported as a quantity net again (for that functionality, see [`QuantityNet::export_json`]).
    pub fn export_png<P: AsRef<Path>>(&self, path: P, marked: bool) -> Result<PathBuf, ExportError> {
        self.to_graph(marked)?.export_png(path)
    }
}

#[cfg(test)]
mod test {
    use std::{
        collections::{BTreeSet, HashSet},
        path::PathBuf,
    };

    use graphviz_rust::dot_structures::{EdgeTy, Graph, Id, Stmt, Vertex};
    use proptest::prelude::*;

    use super::{normalize_export_path, ConfigurationError, ExportError, ExportFormat};
    use crate::{
        core::process_models::quantity_net::{
            graph::{GraphBuilder, GraphDescriptor, GraphOptions},
            CollectionPoint, ObjectArc, ObjectPlace, QuantityNet,
        },
        utils::test_utils::get_test_data_path,
    };

    /// Names with spaces, quotes, backslashes and non-ASCII characters
    const NAME: &str = r#"[a-zA-Z0-9 "\\äöß→€]{0,8}"#;

    fn sample_net() -> QuantityNet {
        let path = get_test_data_path()
            .join("quantity_net")
            .join("order_handling.json");
        QuantityNet::import_json(path).unwrap()
    }

    /// Text of a DOT id, with quoting and escapes undone
    fn unquote(id: &Id) -> String {
        match id {
            Id::Escaped(s) => {
                let inner = s
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(s.as_str());
                let mut text = String::new();
                let mut chars = inner.chars();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => text.extend(chars.next()),
                        c => text.push(c),
                    }
                }
                text
            }
            Id::Html(s) | Id::Plain(s) | Id::Anonymous(s) => s.clone(),
        }
    }

    /// Node ids and (source, target) pairs of the descriptors
    fn descriptor_ids(graph: &GraphDescriptor) -> (HashSet<String>, BTreeSet<(String, String)>) {
        let nodes: HashSet<String> = graph.nodes().iter().map(|n| n.id().to_string()).collect();
        let edges: BTreeSet<(String, String)> = graph
            .edges()
            .iter()
            .map(|e| (e.source().to_string(), e.target().to_string()))
            .collect();
        (nodes, edges)
    }

    /// Node ids and (source, target) pairs of a parsed DOT graph
    fn parsed_ids(g: &Graph) -> (HashSet<String>, BTreeSet<(String, String)>) {
        let stmts = match g {
            Graph::DiGraph { stmts, .. } | Graph::Graph { stmts, .. } => stmts,
        };
        let mut nodes = HashSet::new();
        let mut edges = BTreeSet::new();
        for stmt in stmts {
            match stmt {
                Stmt::Node(n) => {
                    nodes.insert(unquote(&n.id.0));
                }
                Stmt::Edge(e) => {
                    if let EdgeTy::Pair(Vertex::N(from), Vertex::N(to)) = &e.ty {
                        edges.insert((unquote(&from.0), unquote(&to.0)));
                    }
                }
                _ => {}
            }
        }
        (nodes, edges)
    }

    #[test]
    fn test_get_text_requires_built_graph() {
        let graph = sample_net().to_graph(false).unwrap();
        assert_eq!(graph.get_text().unwrap_err(), ConfigurationError::NotBuilt);
    }

    #[test]
    fn test_empty_graph_is_not_exportable() {
        let mut graph = QuantityNet::new().to_graph(false).unwrap();
        graph.create_graph();
        assert_eq!(graph.get_text().unwrap_err(), ConfigurationError::EmptyGraph);

        let dir = tempfile::tempdir().unwrap();
        let err = graph.export(dir.path().join("empty"), ExportFormat::Svg).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Configuration(ConfigurationError::EmptyGraph)
        ));
    }

    #[test]
    fn test_dot_text_contains_layout_configuration() {
        let mut graph = sample_net().to_graph(true).unwrap();
        graph.create_graph();
        let dot = graph.get_text().unwrap();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("seed=42"));
        assert!(dot.contains("ratio=0.35"));
        assert!(!dot.contains("obj_label"));
        assert!(!dot.contains("display_label"));
        assert!(!dot.contains("source_id"));
    }

    #[test]
    fn test_dot_round_trip() {
        let mut graph = sample_net().to_graph(true).unwrap();
        graph.create_graph();
        let dot = graph.get_text().unwrap();
        let parsed = graphviz_rust::parse(&dot).unwrap();
        assert_eq!(parsed_ids(&parsed), descriptor_ids(&graph));
    }

    #[test]
    fn test_dot_round_trip_with_quotes_and_backslashes() {
        let mut net = QuantityNet::new();
        net.add_object_type("order", true);
        net.add_transition("say \"hi\"", Some(r"C:\".to_string()), false);
        net.add_object_place(ObjectPlace::new(r"p\", "order"));
        net.add_object_arc(ObjectArc::new("a", "order", r"p\", "say \"hi\""));
        net.add_collection_point(CollectionPoint::new("cp \"1\"", Some(r"Stock\".to_string()), false));
        net.add_quantity_arc("q", "say \"hi\"", "cp \"1\"");

        let mut graph = GraphBuilder::new(GraphOptions {
            graph_name: r#"net "a\b""#.to_string(),
            ..GraphOptions::default()
        })
        .build(&net, false)
        .unwrap();
        graph.create_graph();
        let dot = graph.get_text().unwrap();
        assert!(dot.contains(r#""say \"hi\"""#));
        assert!(dot.contains(r#"label="C:\\""#));

        let parsed = graphviz_rust::parse(&dot).unwrap();
        assert_eq!(parsed_ids(&parsed), descriptor_ids(&graph));
        let Graph::DiGraph { id, .. } = &parsed else {
            panic!("expected a directed graph");
        };
        assert_eq!(unquote(id), r#"net "a\b""#);
    }

    prop_compose! {
        fn arb_named_net()(
            object_type in NAME,
            transitions in proptest::collection::vec((NAME, NAME), 1..4),
            places in proptest::collection::vec(NAME, 0..4),
            collection_points in proptest::collection::vec(
                (NAME, proptest::option::of(NAME), any::<bool>()),
                0..3,
            )
        ) -> QuantityNet {
            let mut net = QuantityNet::new();
            net.add_object_type(object_type.clone(), true);
            for (i, (name, label)) in transitions.into_iter().enumerate() {
                net.add_transition(format!("t{i}:{name}"), Some(label), false);
            }
            let first = net.transitions[0].name.clone();
            for (i, name) in places.into_iter().enumerate() {
                let place = format!("p{i}:{name}");
                net.add_object_place(ObjectPlace::new(place.clone(), object_type.clone()));
                net.add_object_arc(ObjectArc::new(format!("a{i}"), object_type.clone(), place, first.clone()));
            }
            for (i, (name, label, silent)) in collection_points.into_iter().enumerate() {
                let collection_point = format!("c{i}:{name}");
                net.add_collection_point(
                    CollectionPoint::new(collection_point.clone(), label, silent).with_item_types([name]),
                );
                net.add_quantity_arc(format!("q{i}"), first.clone(), collection_point);
            }
            net
        }
    }

    proptest! {
        #[test]
        fn prop_dot_round_trip_preserves_ids(
            net in arb_named_net(),
            graph_name in NAME,
            marked in any::<bool>()
        ) {
            let options = GraphOptions {
                graph_name: graph_name.clone(),
                ..GraphOptions::default()
            };
            let mut graph = GraphBuilder::new(options).build(&net, marked).unwrap();
            graph.create_graph();
            let parsed = graphviz_rust::parse(&graph.get_text().unwrap()).unwrap();
            prop_assert_eq!(parsed_ids(&parsed), descriptor_ids(&graph));
            if let Graph::DiGraph { id, .. } = &parsed {
                prop_assert_eq!(unquote(id), graph_name);
            }
        }
    }

    #[test]
    fn test_nodes_are_added_before_edges() {
        let mut graph = sample_net().to_graph(false).unwrap();
        graph.create_graph();
        let stmts = match graph.graph().unwrap() {
            Graph::DiGraph { stmts, .. } | Graph::Graph { stmts, .. } => stmts,
        };
        let first_edge = stmts.iter().position(|s| matches!(s, Stmt::Edge(_))).unwrap();
        let last_node = stmts.iter().rposition(|s| matches!(s, Stmt::Node(_))).unwrap();
        assert!(last_node < first_edge);
    }

    #[test]
    fn test_create_graph_replaces_handle() {
        let net = sample_net();
        let mut graph = net.to_graph(false).unwrap();
        graph.create_graph();
        let first = graph.get_text().unwrap();
        graph.create_graph();
        assert_eq!(graph.get_text().unwrap(), first);

        graph.clear_graph();
        assert!(!graph.is_built());
        assert_eq!(graph.get_text().unwrap_err(), ConfigurationError::NotBuilt);
    }

    #[test]
    fn test_normalize_export_path() {
        assert_eq!(
            normalize_export_path("out/net", ExportFormat::Svg),
            PathBuf::from("out/net.svg")
        );
        assert_eq!(
            normalize_export_path("out/net.SVG", ExportFormat::Svg),
            PathBuf::from("out/net.SVG")
        );
        assert_eq!(
            normalize_export_path("net.png", ExportFormat::Svg),
            PathBuf::from("net.png.svg")
        );
        assert_eq!(
            normalize_export_path("net", ExportFormat::Dot),
            PathBuf::from("net.dot")
        );
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("SVG".parse::<ExportFormat>().unwrap(), ExportFormat::Svg);
        assert_eq!("png".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("dot".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert_eq!(
            "pdf".parse::<ExportFormat>().unwrap_err(),
            ConfigurationError::UnsupportedFormat("pdf".to_string())
        );
    }

    #[test]
    #[ignore = "requires a local graphviz installation"]
    pub fn test_quantity_net_svg_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = sample_net().to_graph(true).unwrap();
        let path = graph.export(dir.path().join("quantity-net-export-test"), ExportFormat::Svg).unwrap();
        assert_eq!(path.extension().unwrap(), "svg");
        assert!(std::fs::read_to_string(path).unwrap().contains("<svg"));
        assert!(graph.is_built());
    }

    #[test]
    #[ignore = "requires a local graphviz installation"]
    pub fn test_quantity_net_png_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_net()
            .export_png(dir.path().join("quantity-net-export-test.png"), false)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    #[ignore = "requires a local graphviz installation"]
    pub fn test_quantity_net_dot_export_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = sample_net().to_graph(false).unwrap();
        let path = graph.export_to_dir(dir.path(), ExportFormat::Dot).unwrap();
        assert_eq!(path, dir.path().join("quantity_net.dot"));
    }
}
