//! Process models

/// Quantity nets
pub mod quantity_net;
