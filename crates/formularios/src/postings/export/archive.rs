use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Deflate level used for every entry at every nesting level.
pub const COMPRESSION_LEVEL: i64 = 9;

/// Internal encoder failure while assembling an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveEncodingError {
    #[error("zip encoder failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write archive entry '{name}': {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },
}

/// In-memory deflate archive with named binary entries.
///
/// Each builder is owned by exactly one packaging step and consumed by
/// [`ArchiveBuilder::finalize`], so no entry can be appended afterwards.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    names: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn open() -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL));

        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            names: HashSet::new(),
        }
    }

    /// Appends one entry and returns the name it was stored under.
    ///
    /// A name already present in this archive gets a ` (n)` suffix before its extension.
    pub fn add_entry(
        &mut self,
        name: &str,
        content: &[u8],
    ) -> Result<String, ArchiveEncodingError> {
        let name = self.unique_name(name);

        self.writer.start_file(name.as_str(), self.options)?;
        self.writer
            .write_all(content)
            .map_err(|source| ArchiveEncodingError::Write {
                name: name.clone(),
                source,
            })?;

        self.names.insert(name.clone());
        Ok(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Writes the central directory and hands back the complete archive.
    pub fn finalize(self) -> Result<Vec<u8>, ArchiveEncodingError> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }

    fn unique_name(&self, requested: &str) -> String {
        if !self.names.contains(requested) {
            return requested.to_string();
        }

        let (stem, extension) = split_extension(requested);
        let mut counter = 2usize;
        loop {
            let candidate = match extension {
                Some(extension) => format!("{stem} ({counter}).{extension}"),
                None => format!("{stem} ({counter})"),
            };
            if !self.names.contains(&candidate) {
                warn!(requested, stored = %candidate, "archive entry name already used; renamed");
                return candidate;
            }
            counter += 1;
        }
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::open()
    }
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(index) if index > 0 && index + 1 < name.len() => {
            (&name[..index], Some(&name[index + 1..]))
        }
        _ => (name, None),
    }
}
