//! IO implementations for `QuantityNet`

use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::core::io::{Exportable, Importable};
use crate::core::process_models::quantity_net::QuantityNet;

/// Error type for `QuantityNet` IO operations
#[derive(Debug, Error)]
pub enum QuantityNetIOError {
    /// IO Error
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON Parsing Error
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    /// Unsupported Format
    #[error("Unsupported Format: {0}")]
    UnsupportedFormat(String),
}

fn is_json(format: &str) -> bool {
    format == "json" || format.ends_with(".json")
}

impl Importable for QuantityNet {
    type Error = QuantityNetIOError;

    fn import_from_reader<R: Read>(reader: R, format: &str) -> Result<Self, Self::Error> {
        if is_json(format) {
            Ok(serde_json::from_reader(reader)?)
        } else {
            Err(QuantityNetIOError::UnsupportedFormat(format.to_string()))
        }
    }
}

impl Exportable for QuantityNet {
    type Error = QuantityNetIOError;

    fn export_to_writer<W: Write>(&self, writer: W, format: &str) -> Result<(), Self::Error> {
        if is_json(format) {
            Ok(serde_json::to_writer_pretty(writer, self)?)
        } else {
            Err(QuantityNetIOError::UnsupportedFormat(format.to_string()))
        }
    }
}

impl QuantityNet {
    /// Import a quantity net snapshot from a JSON file
    ///
    /// For the related export function, see [`QuantityNet::export_json`]
    pub fn import_json<P: AsRef<Path>>(path: P) -> Result<QuantityNet, QuantityNetIOError> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        Self::import_from_reader(reader, "json")
    }

    /// Export the quantity net snapshot to a JSON file
    ///
    /// _Note_: This is an export method for __saving__ the net data.
    /// The resulting file can also be imported again (see [`QuantityNet::import_json`]).
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), QuantityNetIOError> {
        let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.export_to_writer(writer, "json")
    }
}
