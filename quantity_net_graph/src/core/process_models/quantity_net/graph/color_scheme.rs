use itertools::Itertools;
use thiserror::Error;

use crate::core::process_models::quantity_net::ObjectType;

/// Default chart palette (hex RGB colors without alpha channel)
pub const CHART_COLOURS: [&str; 12] = [
    "#0098A1", "#CE108A", "#F39200", "#3C6E9F", "#9BCA3E", "#E94E1B", "#A66FB5", "#FFCC00",
    "#00A37A", "#8C564B", "#7D7D7D", "#17BECF",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("color palette exhausted: {requested} object types, but only {available} colors available")]
/// More distinct object types than palette colors
pub struct PaletteExhaustedError {
    /// Number of distinct object types that required a color
    pub requested: usize,
    /// Palette size
    pub available: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
///
/// Colors assigned to object types (in assignment order)
///
pub struct ColorScheme {
    colors: Vec<(String, String)>,
}

impl ColorScheme {
    /// Color of the object type with the given name
    pub fn get(&self, object_type: &str) -> Option<&str> {
        self.colors
            .iter()
            .find(|(ot, _)| ot == object_type)
            .map(|(_, color)| color.as_str())
    }
    /// Iterate over (object type, color) pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(ot, c)| (ot.as_str(), c.as_str()))
    }
    /// Number of object types with a color
    pub fn len(&self) -> usize {
        self.colors.len()
    }
    /// Whether no color was assigned
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
///
/// Assigns palette colors to object types
///
/// Colors are drawn from the palette in the order the object types are given.
/// The assignment never wraps around: if there are more object types than colors,
/// [`ColorAssigner::assign`] fails with a [`PaletteExhaustedError`].
pub struct ColorAssigner {
    palette: Vec<String>,
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new(CHART_COLOURS.iter().map(|c| c.to_string()).collect())
    }
}

impl ColorAssigner {
    /// Create a [`ColorAssigner`] using the given palette
    ///
    /// Repeated colors are dropped, so every color is assigned to at most one object type.
    pub fn new(palette: Vec<String>) -> Self {
        Self {
            palette: palette.into_iter().unique().collect(),
        }
    }

    /// Number of available (distinct) colors
    pub fn palette_size(&self) -> usize {
        self.palette.len()
    }

    /// Assign one color per distinct object type
    ///
    /// Repeated object types keep the color of their first occurrence.
    pub fn assign<'a, I>(&self, object_types: I) -> Result<ColorScheme, PaletteExhaustedError>
    where
        I: IntoIterator<Item = &'a ObjectType>,
    {
        let names: Vec<&str> = object_types
            .into_iter()
            .map(|ot| ot.name.as_str())
            .unique()
            .collect();
        if names.len() > self.palette.len() {
            return Err(PaletteExhaustedError {
                requested: names.len(),
                available: self.palette.len(),
            });
        }
        let colors = names
            .into_iter()
            .zip(self.palette.iter())
            .map(|(ot, color)| (ot.to_string(), color.clone()))
            .collect();
        Ok(ColorScheme { colors })
    }
}
