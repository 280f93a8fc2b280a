use std::io::{Read, Write};
use std::path::Path;

/// Lowercase file extension of `path`, used as format name
fn format_of(path: &Path) -> std::io::Result<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("no format extension in {}", path.display()),
            )
        })
}

/// Snapshot types that can be read in a named format
pub trait Importable: Sized {
    /// The error type returned by import operations
    type Error: std::error::Error + From<std::io::Error>;

    /// Import from a reader, specifying the format.
    fn import_from_reader<R: Read>(reader: R, format: &str) -> Result<Self, Self::Error>;

    /// Import from a file path, with the format taken from the file extension.
    fn import_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        Self::import_from_reader(reader, &format)
    }
}

/// Snapshot types that can be written in a named format
pub trait Exportable {
    /// The error type returned by export operations
    type Error: std::error::Error + From<std::io::Error>;

    /// Export to a writer, specifying the format.
    fn export_to_writer<W: Write>(&self, writer: W, format: &str) -> Result<(), Self::Error>;

    /// Export to a file path, with the format taken from the file extension.
    fn export_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Self::Error> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.export_to_writer(writer, &format)
    }
}
