use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
/// Object type of a [`QuantityNet`]
///
/// Object types are identified by their name.
pub struct ObjectType {
    /// Name of the object type
    pub name: String,
    /// Whether objects of this type are recorded in the event log
    ///
    /// Places and object arcs of non-log object types are not drawn
    #[serde(default = "default_true")]
    pub log_object_type: bool,
}

impl ObjectType {
    /// Create a new [`ObjectType`]
    pub fn new<S: Into<String>>(name: S, log_object_type: bool) -> Self {
        Self {
            name: name.into(),
            log_object_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
///
/// Marking of an [`ObjectPlace`]
///
/// Multiset of object tokens, each token being the identifier of an object.
/// The same object identifier may occur multiple times.
pub struct Marking {
    tokens: Vec<String>,
}

impl Marking {
    /// Create a new empty [`Marking`]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a token for the given object
    pub fn add_token<S: Into<String>>(&mut self, object_id: S) {
        self.tokens.push(object_id.into());
    }
    /// Number of tokens (counting duplicates)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
    /// Whether no token is present
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    /// Number of tokens of the given object
    pub fn count(&self, object_id: &str) -> usize {
        self.tokens.iter().filter(|t| *t == object_id).count()
    }
    /// Iterate over all tokens
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Marking {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Place holding object tokens of a single [`ObjectType`]
pub struct ObjectPlace {
    /// Place name (unique among all nodes of the net)
    pub name: String,
    /// Name of the [`ObjectType`] of this place
    pub object_type: String,
    /// Current marking
    #[serde(default)]
    pub marking: Marking,
    /// Whether the place is an initial place of its object type
    #[serde(default)]
    pub initial: bool,
    /// Whether the place is a final place of its object type
    #[serde(default, rename = "final")]
    pub final_place: bool,
}

impl ObjectPlace {
    /// Create a new (unmarked, non-initial, non-final) [`ObjectPlace`]
    pub fn new<S: Into<String>, T: Into<String>>(name: S, object_type: T) -> Self {
        Self {
            name: name.into(),
            object_type: object_type.into(),
            marking: Marking::default(),
            initial: false,
            final_place: false,
        }
    }
    /// Mark this place as initial place
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }
    /// Mark this place as final place
    pub fn final_place(mut self) -> Self {
        self.final_place = true;
        self
    }
    /// Set the marking of this place
    pub fn with_marking(mut self, marking: Marking) -> Self {
        self.marking = marking;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Transition in a [`QuantityNet`]
pub struct Transition {
    /// Transition name (unique among all nodes of the net)
    pub name: String,
    /// Transition label (activity)
    #[serde(default)]
    pub label: Option<String>,
    /// Silent transitions do not correspond to an activity recorded in the log
    #[serde(default)]
    pub silent: bool,
}

impl Transition {
    /// Create a new [`Transition`]
    pub fn new<S: Into<String>>(name: S, label: Option<String>, silent: bool) -> Self {
        Self {
            name: name.into(),
            label,
            silent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Arc moving object tokens between an [`ObjectPlace`] and a [`Transition`]
pub struct ObjectArc {
    /// Arc name
    pub name: String,
    /// Name of the [`ObjectType`] of the moved tokens
    pub object_type: String,
    /// Name of the source node
    pub source: String,
    /// Name of the target node
    pub target: String,
    /// Variable arcs consume/produce a varying number of tokens per firing
    #[serde(default)]
    pub variable: bool,
    /// Arc label
    #[serde(default)]
    pub label: Option<String>,
}

impl ObjectArc {
    /// Create a new (non-variable, unlabeled) [`ObjectArc`]
    pub fn new<N: Into<String>, O: Into<String>, S: Into<String>, T: Into<String>>(
        name: N,
        object_type: O,
        source: S,
        target: T,
    ) -> Self {
        Self {
            name: name.into(),
            object_type: object_type.into(),
            source: source.into(),
            target: target.into(),
            variable: false,
            label: None,
        }
    }
    /// Make this arc a variable arc
    pub fn variable(mut self) -> Self {
        self.variable = true;
        self
    }
    /// Set the arc label
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Arc connecting a [`Transition`] with a [`CollectionPoint`]
///
/// Quantity arcs carry no object type.
pub struct QuantityArc {
    /// Arc name
    pub name: String,
    /// Name of the source node
    pub source: String,
    /// Name of the target node
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Arcs of a [`QuantityNet`]
pub enum Arc {
    /// Object arc (see [`ObjectArc`])
    Object(ObjectArc),
    /// Quantity arc (see [`QuantityArc`])
    Quantity(QuantityArc),
}

impl Arc {
    /// Arc name
    pub fn name(&self) -> &str {
        match self {
            Arc::Object(a) => &a.name,
            Arc::Quantity(a) => &a.name,
        }
    }
    /// Name of the source node
    pub fn source(&self) -> &str {
        match self {
            Arc::Object(a) => &a.source,
            Arc::Quantity(a) => &a.source,
        }
    }
    /// Name of the target node
    pub fn target(&self) -> &str {
        match self {
            Arc::Object(a) => &a.target,
            Arc::Quantity(a) => &a.target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Collection point, gathering item types during execution
pub struct CollectionPoint {
    /// Collection point name (unique among all nodes of the net)
    pub name: String,
    /// Display label (falls back to the name)
    #[serde(default)]
    pub label: Option<String>,
    /// Item types currently held
    #[serde(default)]
    pub item_types: BTreeSet<String>,
    /// Silent collection points are drawn muted and without caption
    #[serde(default)]
    pub silent: bool,
}

impl CollectionPoint {
    /// Create a new empty [`CollectionPoint`]
    pub fn new<S: Into<String>>(name: S, label: Option<String>, silent: bool) -> Self {
        Self {
            name: name.into(),
            label,
            item_types: BTreeSet::new(),
            silent,
        }
    }
    /// Add the given item types
    pub fn with_item_types<I, S>(mut self, item_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_types
            .extend(item_types.into_iter().map(Into::into));
        self
    }
    /// Label text, falling back to the name if no label is set
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
///
/// Snapshot of a quantity net
///
/// Hybrid Petri net of [`ObjectPlace`]s and [`Transition`]s connected by [`ObjectArc`]s,
/// together with [`CollectionPoint`]s that are connected to transitions by [`QuantityArc`]s.
///
/// The order of all collections is kept, in particular the order of the [`ObjectType`]s,
/// which determines the colors assigned to them when drawing the net.
pub struct QuantityNet {
    /// Object types (in color assignment order)
    #[serde(default)]
    pub object_types: Vec<ObjectType>,
    /// Object places
    #[serde(default)]
    pub object_places: Vec<ObjectPlace>,
    /// Transitions
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Object and quantity arcs
    #[serde(default)]
    pub arcs: Vec<Arc>,
    /// Collection points
    #[serde(default)]
    pub collection_points: Vec<CollectionPoint>,
}

impl QuantityNet {
    /// Create new [`QuantityNet`] without any object types, nodes or arcs
    pub fn new() -> Self {
        Self::default()
    }
    /// Add an object type
    pub fn add_object_type<S: Into<String>>(&mut self, name: S, log_object_type: bool) {
        self.object_types
            .push(ObjectType::new(name, log_object_type));
    }
    /// Add an object place
    pub fn add_object_place(&mut self, place: ObjectPlace) {
        self.object_places.push(place);
    }
    /// Add a transition
    pub fn add_transition<S: Into<String>>(&mut self, name: S, label: Option<String>, silent: bool) {
        self.transitions.push(Transition::new(name, label, silent));
    }
    /// Add an object arc
    pub fn add_object_arc(&mut self, arc: ObjectArc) {
        self.arcs.push(Arc::Object(arc));
    }
    /// Add a quantity arc
    pub fn add_quantity_arc<N: Into<String>, S: Into<String>, T: Into<String>>(
        &mut self,
        name: N,
        source: S,
        target: T,
    ) {
        self.arcs.push(Arc::Quantity(QuantityArc {
            name: name.into(),
            source: source.into(),
            target: target.into(),
        }));
    }
    /// Add a collection point
    pub fn add_collection_point(&mut self, collection_point: CollectionPoint) {
        self.collection_points.push(collection_point);
    }
    /// Get the object type with the given name
    pub fn get_object_type(&self, name: &str) -> Option<&ObjectType> {
        self.object_types.iter().find(|ot| ot.name == name)
    }
    /// Get the object place with the given name
    pub fn get_object_place(&self, name: &str) -> Option<&ObjectPlace> {
        self.object_places.iter().find(|p| p.name == name)
    }
    /// Iterate over all object arcs
    pub fn object_arcs(&self) -> impl Iterator<Item = &ObjectArc> {
        self.arcs.iter().filter_map(|arc| match arc {
            Arc::Object(a) => Some(a),
            Arc::Quantity(_) => None,
        })
    }
    /// Iterate over all quantity arcs
    pub fn quantity_arcs(&self) -> impl Iterator<Item = &QuantityArc> {
        self.arcs.iter().filter_map(|arc| match arc {
            Arc::Quantity(a) => Some(a),
            Arc::Object(_) => None,
        })
    }
    /// Iterate over the object places whose object type is recorded in the event log
    pub fn log_object_places(&self) -> impl Iterator<Item = &ObjectPlace> {
        self.object_places.iter().filter(|p| {
            self.get_object_type(&p.object_type)
                .is_some_and(|ot| ot.log_object_type)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Arc, CollectionPoint, Marking, ObjectArc, ObjectPlace, QuantityNet};

    pub const SAMPLE_JSON_NET: &str = r#"
{
    "object_types": [
        { "name": "order" },
        { "name": "item", "log_object_type": false }
    ],
    "object_places": [
        { "name": "p_order_start", "object_type": "order", "marking": ["o1", "o2"], "initial": true },
        { "name": "p_item", "object_type": "item", "marking": ["i1"] }
    ],
    "transitions": [
        { "name": "t_place_order", "label": "place order" },
        { "name": "t_tau", "silent": true }
    ],
    "arcs": [
        { "type": "object", "name": "a1", "object_type": "order", "source": "p_order_start", "target": "t_place_order", "variable": true },
        { "type": "quantity", "name": "q1", "source": "t_place_order", "target": "cp_stock" }
    ],
    "collection_points": [
        { "name": "cp_stock", "label": "Stock", "item_types": ["book", "pen"] }
    ]
}"#;

    #[test]
    fn test_quantity_net_json_deserialization() {
        let net: QuantityNet = serde_json::from_str(SAMPLE_JSON_NET).unwrap();
        assert_eq!(net.object_types.len(), 2);
        assert!(net.object_types[0].log_object_type);
        assert!(!net.object_types[1].log_object_type);

        let start = net.get_object_place("p_order_start").unwrap();
        assert!(start.initial);
        assert!(!start.final_place);
        assert_eq!(start.marking.len(), 2);

        assert_eq!(net.object_arcs().count(), 1);
        assert_eq!(net.quantity_arcs().count(), 1);
        assert!(net.object_arcs().next().unwrap().variable);
        assert_eq!(net.collection_points[0].item_types.len(), 2);
        assert!(net.transitions[1].silent);
        assert_eq!(net.transitions[1].label, None);
    }

    #[test]
    fn test_quantity_net_json_roundtrip() {
        let net: QuantityNet = serde_json::from_str(SAMPLE_JSON_NET).unwrap();
        let json = serde_json::to_string(&net).unwrap();
        let net2: QuantityNet = serde_json::from_str(&json).unwrap();
        assert_eq!(net, net2);
    }

    #[test]
    fn test_log_object_places_skip_non_log_types() {
        let net: QuantityNet = serde_json::from_str(SAMPLE_JSON_NET).unwrap();
        let names: Vec<_> = net.log_object_places().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p_order_start"]);
    }

    #[test]
    fn test_marking_is_multiset() {
        let mut marking: Marking = ["o1", "o1", "o2"].into_iter().collect();
        marking.add_token("o3");
        assert_eq!(marking.len(), 4);
        assert_eq!(marking.count("o1"), 2);
        assert_eq!(marking.count("o4"), 0);
        assert!(!marking.is_empty());
        assert!(Marking::new().is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let mut net = QuantityNet::new();
        net.add_object_type("order", true);
        net.add_object_place(ObjectPlace::new("p1", "order").initial());
        net.add_transition("t1", Some("create".to_string()), false);
        net.add_object_arc(ObjectArc::new("a1", "order", "p1", "t1").with_label("x"));
        net.add_collection_point(
            CollectionPoint::new("cp", None, false).with_item_types(["a", "b", "a"]),
        );
        net.add_quantity_arc("q1", "t1", "cp");

        assert_eq!(net.arcs.len(), 2);
        assert_eq!(net.arcs[1].source(), "t1");
        assert_eq!(net.arcs[1].target(), "cp");
        assert!(matches!(&net.arcs[0], Arc::Object(a) if a.label.as_deref() == Some("x")));
        assert_eq!(net.collection_points[0].item_types.len(), 2);
        assert_eq!(net.collection_points[0].display_name(), "cp");
    }
}
