use crate::error::HarvestError;
use crate::results::{COLUMNS, Listing};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Destination for the final, deduplicated listing set
pub trait ListingSink {
    fn write_all(&mut self, listings: &[Listing]) -> Result<(), HarvestError>;
}

/// Writes listings as CSV with a fixed header row
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Create the file, and its parent directory if missing
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, HarvestError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self::from_writer(File::create(path)?))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
        }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, HarvestError> {
        self.writer
            .into_inner()
            .map_err(|e| HarvestError::Io(e.into_error()))
    }
}

impl<W: Write> ListingSink for CsvSink<W> {
    fn write_all(&mut self, listings: &[Listing]) -> Result<(), HarvestError> {
        self.writer.write_record(COLUMNS)?;
        for listing in listings {
            self.writer.serialize(listing)?;
        }
        self.writer.flush()?;
        ::log::debug!("Wrote {} listings", listings.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            title: "Hydraulic Press".to_string(),
            price: "₹ 1,25,000/Unit".to_string(),
            supplier: "ABC Traders".to_string(),
            location: "Mumbai, Maharashtra".to_string(),
            category: "Industrial Machinery".to_string(),
            url: "https://www.indiamart.com/proddetail/press-1.html".to_string(),
            scraped_at: "2024-05-01 10:00:00".to_string(),
        }
    }

    fn render(listings: &[Listing]) -> String {
        let mut sink = CsvSink::from_writer(Vec::new());
        sink.write_all(listings).unwrap();
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let mut unresolved = listing();
        unresolved.price.clear();
        unresolved.supplier.clear();
        unresolved.location.clear();

        let output = render(&[listing(), unresolved]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "title,price,supplier,location,category,url,scraped_at");
        assert_eq!(
            lines[1],
            "Hydraulic Press,\"₹ 1,25,000/Unit\",ABC Traders,\"Mumbai, Maharashtra\",Industrial Machinery,https://www.indiamart.com/proddetail/press-1.html,2024-05-01 10:00:00"
        );
        assert_eq!(
            lines[2],
            "Hydraulic Press,,,,Industrial Machinery,https://www.indiamart.com/proddetail/press-1.html,2024-05-01 10:00:00"
        );
    }

    #[test]
    fn test_empty_set_still_has_header() {
        assert_eq!(render(&[]), "title,price,supplier,location,category,url,scraped_at\n");
    }

    #[test]
    fn test_create_makes_parent_directory() {
        let dir = std::env::temp_dir().join(format!("catalog-harvest-{}", std::process::id()));
        let path = dir.join("nested").join("listings.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_all(&[listing()]).unwrap();
        drop(sink);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("title,price"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
