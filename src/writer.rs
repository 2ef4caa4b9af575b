//! CSV output of a scraped [`MetadataSet`].

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::debug;

use crate::error::Result;
use crate::metadata::MetadataSet;

const FILENAME_COLUMN: &str = "filename";

/// Writes one header row and one row per filename.
pub struct CsvMetadataWriter<'a, W: Write> {
    writer: Writer<W>,
    metadata: &'a MetadataSet,
    columns: Vec<&'a str>,
}

impl<'a> CsvMetadataWriter<'a, File> {
    /// Create (or truncate) the file at `path`. Parent directories are not
    /// created.
    pub fn create(path: impl AsRef<Path>, metadata: &'a MetadataSet) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened output file");
        Ok(Self::new(file, metadata))
    }
}

impl<'a, W: Write> CsvMetadataWriter<'a, W> {
    pub fn new(inner: W, metadata: &'a MetadataSet) -> Self {
        Self {
            writer: Writer::from_writer(inner),
            metadata,
            columns: Vec::new(),
        }
    }

    /// `filename` followed by every metadata field in first-seen order.
    pub fn columns(&self) -> &[&'a str] {
        &self.columns
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.columns = std::iter::once(FILENAME_COLUMN)
            .chain(
                self.metadata
                    .field_names()
                    .into_iter()
                    .filter(|name| *name != FILENAME_COLUMN),
            )
            .collect();
        self.writer.write_record(&self.columns)?;
        Ok(())
    }

    /// Write the header and every row. Returns the number of data rows.
    pub fn write(&mut self) -> Result<usize> {
        self.write_header()?;

        let mut rows = 0;
        for (filename, fields) in self.metadata.iter() {
            let row = std::iter::once(filename).chain(
                self.columns[1..]
                    .iter()
                    .map(|column| fields.get(column).unwrap_or("")),
            );
            self.writer.write_record(row)?;
            rows += 1;
        }

        Ok(rows)
    }

    /// Flush buffered rows and hand back the underlying writer.
    pub fn close(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::ScrapeError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Fields;

    fn render(metadata: &MetadataSet) -> String {
        let mut writer = CsvMetadataWriter::new(Vec::new(), metadata);
        writer.write().unwrap();
        String::from_utf8(writer.close().unwrap()).unwrap()
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let mut metadata = MetadataSet::new();
        metadata.insert("a.jpg", [("camera", "X")].into_iter().collect());
        metadata.insert("b.jpg", [("iso", "100")].into_iter().collect());

        assert_eq!(render(&metadata), "filename,camera,iso\na.jpg,X,\nb.jpg,,100\n");
    }

    #[test]
    fn test_header_columns() {
        let mut metadata = MetadataSet::new();
        metadata.insert("a.jpg", [("camera", "X"), ("iso", "200")].into_iter().collect());
        metadata.insert("b.jpg", [("lens", "50mm"), ("camera", "Y")].into_iter().collect());

        let mut writer = CsvMetadataWriter::new(Vec::new(), &metadata);
        writer.write_header().unwrap();
        assert_eq!(writer.columns(), &["filename", "camera", "iso", "lens"]);
    }

    #[test]
    fn test_entry_without_fields() {
        let mut metadata = MetadataSet::new();
        metadata.insert("empty.bin", Fields::new());
        metadata.insert("a.jpg", [("camera", "X")].into_iter().collect());

        assert_eq!(render(&metadata), "filename,camera\nempty.bin,\na.jpg,X\n");
    }

    #[test]
    fn test_values_are_quoted_when_needed() {
        let mut metadata = MetadataSet::new();
        metadata.insert("a, b.jpg", [("caption", "say \"hi\"")].into_iter().collect());

        assert_eq!(
            render(&metadata),
            "filename,caption\n\"a, b.jpg\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_filename_metadata_field_not_duplicated() {
        let mut metadata = MetadataSet::new();
        metadata.insert("a.jpg", [("filename", "orig.jpg"), ("iso", "100")].into_iter().collect());

        assert_eq!(render(&metadata), "filename,iso\na.jpg,100\n");
    }
}
