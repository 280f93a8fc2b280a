//! Visual descriptors of quantity net nodes and edges
//!
//! Descriptors are plain values: each one fully describes how a single node or edge
//! is drawn. They are created by the [`GraphBuilder`](super::graph_builder::GraphBuilder)
//! and turned into Graphviz attributes by [`project`](super::attributes::project).

/// Fill color of silent transitions and silent collection points
pub const SILENT_FILL_COLOR: &str = "#00000040";
/// Alpha channel appended to the object type color for filling object places
pub const OBJECT_PLACE_FILL_ALPHA: &str = "70";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Node shape
pub enum Shape {
    /// Object places
    Circle,
    /// Transitions
    Rectangle,
    /// Collection points
    Triangle,
}

impl Shape {
    /// Graphviz shape name
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Rectangle => "rectangle",
            Shape::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Edge line style
pub enum LineStyle {
    /// Regular object arcs
    Solid,
    /// Variable object arcs
    Bold,
    /// Quantity arcs
    Dashed,
}

impl LineStyle {
    /// Graphviz style name
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Bold => "bold",
            LineStyle::Dashed => "dashed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
///
/// Identity and caption of a node or edge
///
/// `display_label` is derived from the label: a caption is displayed iff its label is non-empty.
pub struct Caption {
    /// Identifier (unique among all nodes, or among all edges)
    pub id: String,
    /// Display name
    pub name: String,
    /// Label value
    pub label: String,
    /// Whether the label is shown
    pub display_label: bool,
}

impl Caption {
    /// Create a new [`Caption`]
    pub fn new<I: Into<String>, N: Into<String>, L: Into<String>>(id: I, name: N, label: L) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            name: name.into(),
            display_label: !label.is_empty(),
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Appearance of a node
pub struct NodeStyle {
    /// Shape
    pub shape: Shape,
    /// Border color
    pub color: String,
    /// Fill color
    pub fill_color: String,
    /// Border width
    pub pen_width: f32,
    /// Whether the node keeps its size regardless of the label
    pub fixed_size: bool,
    /// Width (inches)
    pub width: f32,
    /// Height (inches)
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
/// Appearance of an edge
pub struct EdgeStyle {
    /// Line style
    pub line: LineStyle,
    /// Line color
    pub color: String,
    /// Line width
    pub pen_width: f32,
    /// Whether an arrow head is drawn
    pub directed: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Object place node
pub struct ObjectPlaceNode {
    /// Identity and caption (token count when marked)
    pub caption: Caption,
    /// Appearance
    pub style: NodeStyle,
    /// Object type name
    pub object_type: String,
    /// Set for initial places: the object type annotated next to the place
    pub initial_object_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Transition node (silent or visible)
pub struct TransitionNode {
    /// Identity and caption (transition label)
    pub caption: Caption,
    /// Appearance
    pub style: NodeStyle,
}

#[derive(Debug, Clone, PartialEq)]
/// Collection point node (silent or visible)
pub struct CollectionPointNode {
    /// Identity and caption (number of item types)
    pub caption: Caption,
    /// Appearance
    pub style: NodeStyle,
    /// Number of distinct item types held
    pub item_types: usize,
    /// External label drawn next to the node
    pub xlabel: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Descriptor of a node in the quantity net graph
pub enum NodeDescriptor {
    /// Object place
    ObjectPlace(ObjectPlaceNode),
    /// Visible transition
    Transition(TransitionNode),
    /// Silent transition
    SilentTransition(TransitionNode),
    /// Visible collection point
    CollectionPoint(CollectionPointNode),
    /// Silent collection point
    SilentCollectionPoint(CollectionPointNode),
}

impl NodeDescriptor {
    /// Object place node, filled with a translucent version of the object type color
    pub fn object_place(
        caption: Caption,
        color: &str,
        object_type: &str,
        initial: bool,
    ) -> Self {
        NodeDescriptor::ObjectPlace(ObjectPlaceNode {
            caption,
            style: NodeStyle {
                shape: Shape::Circle,
                color: color.to_string(),
                fill_color: format!("{color}{OBJECT_PLACE_FILL_ALPHA}"),
                pen_width: 1.0,
                fixed_size: true,
                width: 0.5,
                height: 0.5,
            },
            object_type: object_type.to_string(),
            initial_object_type: initial.then(|| object_type.to_string()),
        })
    }

    /// Transition node
    pub fn transition(caption: Caption, silent: bool) -> Self {
        if silent {
            NodeDescriptor::SilentTransition(TransitionNode {
                caption,
                style: NodeStyle {
                    shape: Shape::Rectangle,
                    color: "black".to_string(),
                    fill_color: SILENT_FILL_COLOR.to_string(),
                    pen_width: 1.0,
                    fixed_size: false,
                    width: 0.1,
                    height: 0.5,
                },
            })
        } else {
            NodeDescriptor::Transition(TransitionNode {
                caption,
                style: NodeStyle {
                    shape: Shape::Rectangle,
                    color: "black".to_string(),
                    fill_color: "white".to_string(),
                    pen_width: 1.0,
                    fixed_size: false,
                    width: 0.5,
                    height: 0.5,
                },
            })
        }
    }

    /// Collection point node
    ///
    /// Visible collection points show `xlabel` next to the triangle, silent ones do not.
    pub fn collection_point(
        caption: Caption,
        item_types: usize,
        xlabel: &str,
        silent: bool,
    ) -> Self {
        let style = NodeStyle {
            shape: Shape::Triangle,
            color: "black".to_string(),
            fill_color: (if silent { SILENT_FILL_COLOR } else { "white" }).to_string(),
            pen_width: 2.0,
            fixed_size: true,
            width: 0.75,
            height: 0.75,
        };
        if silent {
            NodeDescriptor::SilentCollectionPoint(CollectionPointNode {
                caption,
                style,
                item_types,
                xlabel: None,
            })
        } else {
            NodeDescriptor::CollectionPoint(CollectionPointNode {
                caption,
                style,
                item_types,
                xlabel: Some(xlabel.to_string()),
            })
        }
    }

    /// Identity and caption
    pub fn caption(&self) -> &Caption {
        match self {
            NodeDescriptor::ObjectPlace(n) => &n.caption,
            NodeDescriptor::Transition(n) | NodeDescriptor::SilentTransition(n) => &n.caption,
            NodeDescriptor::CollectionPoint(n) | NodeDescriptor::SilentCollectionPoint(n) => {
                &n.caption
            }
        }
    }

    /// Appearance
    pub fn style(&self) -> &NodeStyle {
        match self {
            NodeDescriptor::ObjectPlace(n) => &n.style,
            NodeDescriptor::Transition(n) | NodeDescriptor::SilentTransition(n) => &n.style,
            NodeDescriptor::CollectionPoint(n) | NodeDescriptor::SilentCollectionPoint(n) => {
                &n.style
            }
        }
    }

    /// Identifier
    pub fn id(&self) -> &str {
        &self.caption().id
    }

    /// Class name (used as SVG class)
    pub fn class_name(&self) -> &str {
        match self {
            NodeDescriptor::ObjectPlace(n) => &n.object_type,
            NodeDescriptor::Transition(_) | NodeDescriptor::SilentTransition(_) => "Transition",
            NodeDescriptor::CollectionPoint(_) | NodeDescriptor::SilentCollectionPoint(_) => {
                "CollectionPoint"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Object arc edge
pub struct ObjectArcEdge {
    /// Identity and caption
    pub caption: Caption,
    /// Appearance (colored by object type)
    pub style: EdgeStyle,
    /// Source node identifier
    pub source: String,
    /// Target node identifier
    pub target: String,
    /// Object type name
    pub object_type: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Quantity arc edge
pub struct QuantityArcEdge {
    /// Identity (quantity arcs never show a label)
    pub caption: Caption,
    /// Appearance
    pub style: EdgeStyle,
    /// Source node identifier
    pub source: String,
    /// Target node identifier
    pub target: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Descriptor of an edge in the quantity net graph
pub enum EdgeDescriptor {
    /// Object arc
    ObjectArc(ObjectArcEdge),
    /// Variable object arc (drawn bold)
    VariableObjectArc(ObjectArcEdge),
    /// Quantity arc (drawn dashed, without arrow head)
    QuantityArc(QuantityArcEdge),
}

impl EdgeDescriptor {
    /// Object arc edge in the color of its object type
    pub fn object_arc(
        caption: Caption,
        color: &str,
        object_type: &str,
        source: &str,
        target: &str,
        variable: bool,
    ) -> Self {
        let (line, pen_width) = if variable {
            (LineStyle::Bold, 3.0)
        } else {
            (LineStyle::Solid, 1.0)
        };
        let edge = ObjectArcEdge {
            caption,
            style: EdgeStyle {
                line,
                color: color.to_string(),
                pen_width,
                directed: true,
            },
            source: source.to_string(),
            target: target.to_string(),
            object_type: object_type.to_string(),
        };
        if variable {
            EdgeDescriptor::VariableObjectArc(edge)
        } else {
            EdgeDescriptor::ObjectArc(edge)
        }
    }

    /// Quantity arc edge
    pub fn quantity_arc(id: &str, source: &str, target: &str) -> Self {
        EdgeDescriptor::QuantityArc(QuantityArcEdge {
            caption: Caption::new(id, id, ""),
            style: EdgeStyle {
                line: LineStyle::Dashed,
                color: "black".to_string(),
                pen_width: 1.0,
                directed: false,
            },
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    /// Identity and caption
    pub fn caption(&self) -> &Caption {
        match self {
            EdgeDescriptor::ObjectArc(e) | EdgeDescriptor::VariableObjectArc(e) => &e.caption,
            EdgeDescriptor::QuantityArc(e) => &e.caption,
        }
    }

    /// Appearance
    pub fn style(&self) -> &EdgeStyle {
        match self {
            EdgeDescriptor::ObjectArc(e) | EdgeDescriptor::VariableObjectArc(e) => &e.style,
            EdgeDescriptor::QuantityArc(e) => &e.style,
        }
    }

    /// Identifier
    pub fn id(&self) -> &str {
        &self.caption().id
    }

    /// Source node identifier
    pub fn source(&self) -> &str {
        match self {
            EdgeDescriptor::ObjectArc(e) | EdgeDescriptor::VariableObjectArc(e) => &e.source,
            EdgeDescriptor::QuantityArc(e) => &e.source,
        }
    }

    /// Target node identifier
    pub fn target(&self) -> &str {
        match self {
            EdgeDescriptor::ObjectArc(e) | EdgeDescriptor::VariableObjectArc(e) => &e.target,
            EdgeDescriptor::QuantityArc(e) => &e.target,
        }
    }

    /// Class name (used as SVG class)
    pub fn class_name(&self) -> &'static str {
        match self {
            EdgeDescriptor::ObjectArc(_) | EdgeDescriptor::VariableObjectArc(_) => "ObjectArc",
            EdgeDescriptor::QuantityArc(_) => "QuantityArc",
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Caption, EdgeDescriptor, LineStyle, NodeDescriptor, Shape, SILENT_FILL_COLOR};

    #[test]
    fn test_caption_display_follows_label() {
        assert!(Caption::new("p", "p", "3").display_label);
        assert!(!Caption::new("p", "p", "").display_label);
    }

    #[test]
    fn test_object_place_fill_is_translucent_type_color() {
        let node = NodeDescriptor::object_place(Caption::new("p", "p", ""), "#0098A1", "order", true);
        assert_eq!(node.style().fill_color, "#0098A170");
        assert_eq!(node.style().shape, Shape::Circle);
        assert_eq!(node.class_name(), "order");
        match node {
            NodeDescriptor::ObjectPlace(p) => {
                assert_eq!(p.initial_object_type.as_deref(), Some("order"))
            }
            _ => panic!("expected object place"),
        }
    }

    #[test]
    fn test_silent_variants() {
        let t = NodeDescriptor::transition(Caption::new("t", "t", ""), true);
        assert!(matches!(t, NodeDescriptor::SilentTransition(_)));
        assert_eq!(t.style().fill_color, SILENT_FILL_COLOR);
        assert_eq!(t.style().width, 0.1);

        let cp = NodeDescriptor::collection_point(Caption::new("c", "C", "0"), 0, "C", true);
        match cp {
            NodeDescriptor::SilentCollectionPoint(c) => assert_eq!(c.xlabel, None),
            _ => panic!("expected silent collection point"),
        }
    }

    #[test]
    fn test_variable_arcs_are_bold() {
        let arc = EdgeDescriptor::object_arc(Caption::new("a", "a", ""), "red", "A", "p", "t", true);
        assert!(matches!(arc, EdgeDescriptor::VariableObjectArc(_)));
        assert_eq!(arc.style().line, LineStyle::Bold);
        assert_eq!(arc.style().pen_width, 3.0);

        let arc = EdgeDescriptor::object_arc(Caption::new("a", "a", ""), "red", "A", "p", "t", false);
        assert_eq!(arc.style().line, LineStyle::Solid);
    }

    #[test]
    fn test_quantity_arcs_are_undirected_and_unlabeled() {
        let arc = EdgeDescriptor::quantity_arc("q", "t", "cp");
        assert!(!arc.style().directed);
        assert!(!arc.caption().display_label);
        assert_eq!(arc.source(), "t");
        assert_eq!(arc.target(), "cp");
        assert_eq!(arc.class_name(), "QuantityArc");
    }
}
