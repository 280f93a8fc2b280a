use std::{collections::HashSet, fmt::Display};

use thiserror::Error;
use tracing::{debug, debug_span, trace};

use super::{
    color_scheme::{ColorAssigner, ColorScheme, PaletteExhaustedError},
    descriptors::{Caption, EdgeDescriptor, NodeDescriptor},
    options::GraphOptions,
    quantity_graph::{GraphDescriptor, GraphHandle},
};
use crate::core::process_models::quantity_net::{ObjectType, QuantityNet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of graph element
pub enum ElementKind {
    /// Node (transition, object place or collection point)
    Node,
    /// Edge (object arc or quantity arc)
    Edge,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Edge => write!(f, "edge"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate {kind} identifier `{id}`")]
/// Two nodes (or two edges) share the same identifier
pub struct DuplicateIdError {
    /// Whether a node or an edge identifier collided
    pub kind: ElementKind,
    /// The colliding identifier
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Error while building the descriptors of a [`QuantityNet`]
pub enum QuantityGraphError {
    /// More object types than colors
    #[error(transparent)]
    PaletteExhausted(#[from] PaletteExhaustedError),
    /// Identifier collision
    #[error(transparent)]
    DuplicateId(#[from] DuplicateIdError),
    /// A place or arc refers to an object type that is not part of the net
    #[error("`{element}` refers to unknown object type `{object_type}`")]
    UnknownObjectType {
        /// Name of the place or arc
        element: String,
        /// Name of the missing object type
        object_type: String,
    },
}

/// Collects descriptors, rejecting duplicate identifiers
struct UniqueDescriptors<T> {
    kind: ElementKind,
    ids: HashSet<String>,
    items: Vec<T>,
}

impl<T> UniqueDescriptors<T> {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ids: HashSet::new(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, id: &str, item: T) -> Result<(), DuplicateIdError> {
        if !self.ids.insert(id.to_string()) {
            return Err(DuplicateIdError {
                kind: self.kind,
                id: id.to_string(),
            });
        }
        self.items.push(item);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
///
/// Builds the [`GraphDescriptor`] of a [`QuantityNet`] snapshot
///
/// * Every transition becomes a (silent) transition node labeled with its label
/// * Object places become object place nodes, unless their object type is not a log object type.
///   If `marked` is set, non-empty places are labeled with their number of tokens.
/// * Every collection point becomes a (silent) collection point node labeled with the number of item types it holds
///   (also if that number is `0`)
/// * Object arcs become edges in the color of their object type (bold for variable arcs), unless their object type
///   is not a log object type
/// * Quantity arcs become dashed, undirected edges without label
///
pub struct GraphBuilder {
    options: GraphOptions,
}

impl GraphBuilder {
    /// Create a [`GraphBuilder`] with the given options
    pub fn new(options: GraphOptions) -> Self {
        Self { options }
    }

    /// Options used for building
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Build the descriptors of the given snapshot
    pub fn build(&self, net: &QuantityNet, marked: bool) -> Result<GraphDescriptor, QuantityGraphError> {
        let span = debug_span!("build_quantity_graph", marked);
        let _enter = span.enter();

        let color_scheme =
            ColorAssigner::new(self.options.palette.clone()).assign(&net.object_types)?;

        let mut nodes = UniqueDescriptors::new(ElementKind::Node);
        self.add_transition_nodes(net, &mut nodes)?;
        self.add_object_place_nodes(net, &color_scheme, marked, &mut nodes)?;
        self.add_collection_point_nodes(net, &mut nodes)?;

        let mut edges = UniqueDescriptors::new(ElementKind::Edge);
        self.add_object_arc_edges(net, &color_scheme, &mut edges)?;
        self.add_quantity_arc_edges(net, &mut edges)?;

        debug!(
            nodes = nodes.items.len(),
            edges = edges.items.len(),
            object_types = color_scheme.len(),
            "built quantity net descriptors"
        );

        Ok(GraphDescriptor {
            options: self.options.clone(),
            marked,
            color_scheme,
            nodes: nodes.items,
            edges: edges.items,
            handle: GraphHandle::Empty,
        })
    }

    fn add_transition_nodes(
        &self,
        net: &QuantityNet,
        nodes: &mut UniqueDescriptors<NodeDescriptor>,
    ) -> Result<(), QuantityGraphError> {
        for transition in &net.transitions {
            let label = transition.label.as_deref().unwrap_or_default();
            let caption = Caption::new(&transition.name, &transition.name, label);
            nodes.push(
                &transition.name,
                NodeDescriptor::transition(caption, transition.silent),
            )?;
        }
        Ok(())
    }

    fn add_object_place_nodes(
        &self,
        net: &QuantityNet,
        color_scheme: &ColorScheme,
        marked: bool,
        nodes: &mut UniqueDescriptors<NodeDescriptor>,
    ) -> Result<(), QuantityGraphError> {
        for place in &net.object_places {
            let object_type = lookup_object_type(net, &place.name, &place.object_type)?;
            if !object_type.log_object_type {
                trace!(place = %place.name, object_type = %object_type.name, "skipping place of non-log object type");
                continue;
            }
            let color = lookup_color(color_scheme, &place.name, &object_type.name)?;
            let label = if marked && !place.marking.is_empty() {
                place.marking.len().to_string()
            } else {
                String::new()
            };
            let caption = Caption::new(&place.name, &place.name, label);
            nodes.push(
                &place.name,
                NodeDescriptor::object_place(caption, color, &object_type.name, place.initial),
            )?;
        }
        Ok(())
    }

    fn add_collection_point_nodes(
        &self,
        net: &QuantityNet,
        nodes: &mut UniqueDescriptors<NodeDescriptor>,
    ) -> Result<(), QuantityGraphError> {
        for collection_point in &net.collection_points {
            let item_types = collection_point.item_types.len();
            let caption = Caption::new(
                &collection_point.name,
                collection_point.display_name(),
                item_types.to_string(),
            );
            nodes.push(
                &collection_point.name,
                NodeDescriptor::collection_point(
                    caption,
                    item_types,
                    collection_point.display_name(),
                    collection_point.silent,
                ),
            )?;
        }
        Ok(())
    }

    fn add_object_arc_edges(
        &self,
        net: &QuantityNet,
        color_scheme: &ColorScheme,
        edges: &mut UniqueDescriptors<EdgeDescriptor>,
    ) -> Result<(), QuantityGraphError> {
        for arc in net.object_arcs() {
            let object_type = lookup_object_type(net, &arc.name, &arc.object_type)?;
            if !object_type.log_object_type {
                trace!(arc = %arc.name, object_type = %object_type.name, "skipping arc of non-log object type");
                continue;
            }
            let color = lookup_color(color_scheme, &arc.name, &object_type.name)?;
            let label = if self.options.show_object_arc_labels {
                arc.label.as_deref().unwrap_or_default()
            } else {
                ""
            };
            let caption = Caption::new(&arc.name, &arc.name, label);
            edges.push(
                &arc.name,
                EdgeDescriptor::object_arc(
                    caption,
                    color,
                    &object_type.name,
                    &arc.source,
                    &arc.target,
                    arc.variable,
                ),
            )?;
        }
        Ok(())
    }

    fn add_quantity_arc_edges(
        &self,
        net: &QuantityNet,
        edges: &mut UniqueDescriptors<EdgeDescriptor>,
    ) -> Result<(), QuantityGraphError> {
        for arc in net.quantity_arcs() {
            edges.push(
                &arc.name,
                EdgeDescriptor::quantity_arc(&arc.name, &arc.source, &arc.target),
            )?;
        }
        Ok(())
    }
}

fn lookup_object_type<'a>(
    net: &'a QuantityNet,
    element: &str,
    object_type: &str,
) -> Result<&'a ObjectType, QuantityGraphError> {
    net.get_object_type(object_type)
        .ok_or_else(|| QuantityGraphError::UnknownObjectType {
            element: element.to_string(),
            object_type: object_type.to_string(),
        })
}

fn lookup_color<'a>(
    color_scheme: &'a ColorScheme,
    element: &str,
    object_type: &str,
) -> Result<&'a str, QuantityGraphError> {
    color_scheme
        .get(object_type)
        .ok_or_else(|| QuantityGraphError::UnknownObjectType {
            element: element.to_string(),
            object_type: object_type.to_string(),
        })
}

impl QuantityNet {
    /// Build the [`GraphDescriptor`] of this net using the default [`GraphOptions`]
    ///
    /// If `marked` is set, places show their number of tokens.
    pub fn to_graph(&self, marked: bool) -> Result<GraphDescriptor, QuantityGraphError> {
        GraphBuilder::default().build(self, marked)
    }
}
