use serde::{Deserialize, Serialize};

use super::color_scheme::CHART_COLOURS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
/// Direction in which the ranks of the graph are laid out
pub enum RankDirection {
    /// Left to right
    #[default]
    LR,
    /// Top to bottom
    TB,
    /// Right to left
    RL,
    /// Bottom to top
    BT,
}

impl RankDirection {
    /// Graphviz `rankdir` value
    pub fn as_str(&self) -> &'static str {
        match self {
            RankDirection::LR => "LR",
            RankDirection::TB => "TB",
            RankDirection::RL => "RL",
            RankDirection::BT => "BT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
///
/// Options for drawing a [`QuantityNet`](crate::core::process_models::quantity_net::QuantityNet)
///
/// All fields have defaults, so a partial JSON object (or `{}`) is a valid configuration.
pub struct GraphOptions {
    /// Graph name (DOT graph identifier, also used as default export file name)
    pub graph_name: String,
    /// Rank direction (`rankdir`)
    pub rank_direction: RankDirection,
    /// Seed of the layout heuristics
    pub seed: u64,
    /// Aspect ratio of the drawing
    pub ratio: f32,
    /// Colors assigned to object types (in object type order)
    pub palette: Vec<String>,
    /// If Some: Scale the resolution of PNG exports by this factor (relative to 96 dpi)
    pub png_dpi_factor: Option<f32>,
    /// Show the labels of object arcs
    pub show_object_arc_labels: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            graph_name: "quantity_net".to_string(),
            rank_direction: RankDirection::LR,
            seed: 42,
            ratio: 0.35,
            palette: CHART_COLOURS.iter().map(|c| c.to_string()).collect(),
            png_dpi_factor: Some(2.0),
            show_object_arc_labels: false,
        }
    }
}
