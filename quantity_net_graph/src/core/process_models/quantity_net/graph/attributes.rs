use std::collections::BTreeMap;

use graphviz_rust::dot_structures::{Attribute, Id};

use super::descriptors::{Caption, EdgeDescriptor, EdgeStyle, NodeDescriptor, NodeStyle};

/// Font used for all captions
pub const FONT_NAME: &str = "Arial";
/// Font size of node captions
pub const NODE_FONT_SIZE: f32 = 12.0;
/// Font size of edge captions
pub const EDGE_FONT_SIZE: f32 = 10.0;

///
/// Attribute names only used while projecting descriptors
///
/// These never reach Graphviz.
pub const INTERNAL_ATTRIBUTE_NAMES: [&str; 5] =
    ["obj_label", "display_label", "source_id", "target_id", "id"];

///
/// Quote `text` as a DOT string [`Id`]
///
/// Backslashes are escaped before double quotes.
pub fn quoted_id(text: &str) -> Id {
    Id::Escaped(format!(
        "\"{}\"",
        text.replace('\\', "\\\\").replace('"', "\\\"")
    ))
}

#[derive(Debug, Clone, PartialEq)]
/// Value of a Graphviz attribute
pub enum AttributeValue {
    /// Quoted string
    Text(String),
    /// HTML-like label (without the enclosing angle brackets)
    Html(String),
    /// Number
    Number(f32),
    /// Boolean
    Bool(bool),
}

impl AttributeValue {
    /// Convert to a Graphviz [`Id`]
    pub fn to_id(&self) -> Id {
        match self {
            AttributeValue::Text(s) => quoted_id(s),
            AttributeValue::Html(s) => Id::Html(format!("<{s}>")),
            AttributeValue::Number(n) => Id::Plain(n.to_string()),
            AttributeValue::Bool(b) => Id::Plain(b.to_string()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Attribute name to value (ordered by name)
pub type AttributeMap = BTreeMap<&'static str, AttributeValue>;

///
/// Elements that declare their Graphviz attribute fields
///
/// The returned map still contains the [`INTERNAL_ATTRIBUTE_NAMES`]; use [`project`] to obtain
/// the attributes handed to Graphviz.
pub trait GraphvizAttributes {
    /// All attribute fields of this element
    fn attribute_fields(&self) -> AttributeMap;
}

fn insert_caption(attrs: &mut AttributeMap, caption: &Caption) {
    attrs.insert("id", caption.id.as_str().into());
    attrs.insert("name", caption.name.as_str().into());
    attrs.insert("obj_label", caption.label.as_str().into());
    attrs.insert("display_label", caption.display_label.into());
}

fn insert_font(attrs: &mut AttributeMap, size: f32) {
    attrs.insert("fontname", FONT_NAME.into());
    attrs.insert("fontsize", size.into());
    attrs.insert("fontcolor", "black".into());
}

fn insert_node_style(attrs: &mut AttributeMap, style: &NodeStyle) {
    attrs.insert("style", "filled".into());
    attrs.insert("shape", style.shape.as_str().into());
    attrs.insert("color", style.color.as_str().into());
    attrs.insert("fillcolor", style.fill_color.as_str().into());
    attrs.insert("penwidth", style.pen_width.into());
    attrs.insert("fixedsize", style.fixed_size.into());
    attrs.insert("width", style.width.into());
    attrs.insert("height", style.height.into());
}

fn insert_edge_style(attrs: &mut AttributeMap, style: &EdgeStyle) {
    attrs.insert("style", style.line.as_str().into());
    attrs.insert("color", style.color.as_str().into());
    attrs.insert("penwidth", style.pen_width.into());
    if !style.directed {
        attrs.insert("dir", "none".into());
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl GraphvizAttributes for NodeDescriptor {
    fn attribute_fields(&self) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        insert_caption(&mut attrs, self.caption());
        insert_node_style(&mut attrs, self.style());
        insert_font(&mut attrs, NODE_FONT_SIZE);
        attrs.insert("class", self.class_name().into());
        match self {
            NodeDescriptor::ObjectPlace(place) => {
                if let Some(object_type) = &place.initial_object_type {
                    attrs.insert(
                        "xlabel",
                        AttributeValue::Html(format!(
                            "<FONT COLOR='{}'><b>{}</b></FONT>",
                            place.style.color,
                            escape_html(object_type)
                        )),
                    );
                }
            }
            NodeDescriptor::CollectionPoint(cp) | NodeDescriptor::SilentCollectionPoint(cp) => {
                if let Some(xlabel) = &cp.xlabel {
                    attrs.insert("xlabel", xlabel.as_str().into());
                }
            }
            NodeDescriptor::Transition(_) | NodeDescriptor::SilentTransition(_) => {}
        }
        attrs
    }
}

impl GraphvizAttributes for EdgeDescriptor {
    fn attribute_fields(&self) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        insert_caption(&mut attrs, self.caption());
        insert_edge_style(&mut attrs, self.style());
        insert_font(&mut attrs, EDGE_FONT_SIZE);
        attrs.insert("class", self.class_name().into());
        attrs.insert("source_id", self.source().into());
        attrs.insert("target_id", self.target().into());
        attrs
    }
}

///
/// Project the attribute fields of a descriptor to the attributes passed to Graphviz
///
/// See [`project_attributes`].
pub fn project<D: GraphvizAttributes + ?Sized>(descriptor: &D) -> AttributeMap {
    project_attributes(descriptor.attribute_fields())
}

///
/// Apply label visibility and drop internal attributes
///
/// * If `display_label` is true, `label` is set to the label value (`obj_label`)
/// * If it is false, `label` and `name` are both emptied
/// * All [`INTERNAL_ATTRIBUTE_NAMES`] are removed afterwards
///
/// Projecting an already projected map returns it unchanged.
pub fn project_attributes(mut attrs: AttributeMap) -> AttributeMap {
    match attrs.get("display_label") {
        Some(AttributeValue::Bool(true)) => {
            let label = attrs
                .get("obj_label")
                .cloned()
                .unwrap_or_else(|| "".into());
            attrs.insert("label", label);
        }
        Some(_) => {
            attrs.insert("label", "".into());
            attrs.insert("name", "".into());
        }
        None => {}
    }
    attrs.retain(|name, _| !INTERNAL_ATTRIBUTE_NAMES.contains(name));
    attrs
}

/// Convert an [`AttributeMap`] to Graphviz [`Attribute`]s
pub fn to_graphviz_attributes(attrs: &AttributeMap) -> Vec<Attribute> {
    attrs
        .iter()
        .map(|(name, value)| Attribute(Id::Plain(name.to_string()), value.to_id()))
        .collect()
}

#[cfg(test)]
mod test {
    use graphviz_rust::dot_structures::Id;

    use super::{
        project, project_attributes, quoted_id, to_graphviz_attributes, AttributeValue,
        GraphvizAttributes, INTERNAL_ATTRIBUTE_NAMES,
    };
    use crate::core::process_models::quantity_net::graph::descriptors::{
        Caption, EdgeDescriptor, NodeDescriptor,
    };

    #[test]
    fn test_displayed_label_is_projected() {
        let node = NodeDescriptor::object_place(Caption::new("p1", "p1", "3"), "red", "A", false);
        let attrs = project(&node);
        assert_eq!(attrs.get("label"), Some(&AttributeValue::Text("3".into())));
        assert_eq!(attrs.get("name"), Some(&AttributeValue::Text("p1".into())));
    }

    #[test]
    fn test_hidden_label_clears_name() {
        let node = NodeDescriptor::object_place(Caption::new("p1", "p1", ""), "red", "A", false);
        let attrs = project(&node);
        assert_eq!(attrs.get("label"), Some(&AttributeValue::Text(String::new())));
        assert_eq!(attrs.get("name"), Some(&AttributeValue::Text(String::new())));
    }

    #[test]
    fn test_internal_attributes_are_removed() {
        let edge = EdgeDescriptor::object_arc(Caption::new("a", "a", "x"), "red", "A", "p", "t", false);
        assert!(edge.attribute_fields().contains_key("source_id"));
        let attrs = project(&edge);
        for name in INTERNAL_ATTRIBUTE_NAMES {
            assert!(!attrs.contains_key(name), "{name} was not removed");
        }
        assert_eq!(attrs.get("label"), Some(&AttributeValue::Text("x".into())));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let nodes = [
            NodeDescriptor::transition(Caption::new("t", "t", "go"), false),
            NodeDescriptor::collection_point(Caption::new("c", "C", "0"), 0, "C", false),
            NodeDescriptor::object_place(Caption::new("p", "p", ""), "red", "A", true),
        ];
        for node in nodes {
            let once = project(&node);
            let twice = project_attributes(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_initial_place_xlabel_is_html() {
        let node = NodeDescriptor::object_place(Caption::new("p", "p", ""), "#0098A1", "a<b", true);
        let attrs = project(&node);
        assert_eq!(
            attrs.get("xlabel"),
            Some(&AttributeValue::Html(
                "<FONT COLOR='#0098A1'><b>a&lt;b</b></FONT>".into()
            ))
        );
    }

    #[test]
    fn test_quantity_arc_has_no_arrow_head() {
        let attrs = project(&EdgeDescriptor::quantity_arc("q", "t", "cp"));
        assert_eq!(attrs.get("dir"), Some(&AttributeValue::Text("none".into())));
        assert_eq!(attrs.get("style"), Some(&AttributeValue::Text("dashed".into())));
        assert_eq!(attrs.get("label"), Some(&AttributeValue::Text(String::new())));
    }

    #[test]
    fn test_graphviz_ids() {
        assert_eq!(
            AttributeValue::Text("say \"hi\"".into()).to_id(),
            Id::Escaped("\"say \\\"hi\\\"\"".into())
        );
        assert_eq!(AttributeValue::Number(0.5).to_id(), Id::Plain("0.5".into()));
        assert_eq!(AttributeValue::Bool(true).to_id(), Id::Plain("true".into()));

        let attrs = project(&NodeDescriptor::transition(Caption::new("t", "t", "go"), false));
        let gv_attrs = to_graphviz_attributes(&attrs);
        assert_eq!(gv_attrs.len(), attrs.len());
    }

    #[test]
    fn test_backslashes_are_escaped_before_quotes() {
        assert_eq!(quoted_id(r"C:\"), Id::Escaped(r#""C:\\""#.into()));
        assert_eq!(quoted_id(r#"a\"b"#), Id::Escaped(r#""a\\\"b""#.into()));
        assert_eq!(
            AttributeValue::Text(r"C:\".into()).to_id(),
            quoted_id(r"C:\")
        );
    }
}
