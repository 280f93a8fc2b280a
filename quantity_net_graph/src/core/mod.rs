//! Core modules: quantity net snapshots and their graph export

/// IO Traits
pub mod io;

pub mod process_models;

pub use process_models::quantity_net::QuantityNet;
