use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{ImageRef, RecordSet, Scalar};
use crate::error::{ChartError, ChartResult};

/// Maps categorical key values to an image source.
pub trait ImageResolver {
    /// `keys` are `(column, value)` pairs that must all match.
    fn resolve(&self, keys: &[(&str, Scalar)]) -> ChartResult<ImageRef>;
}

/// Looks up an image file name in a record set and inlines the file as a
/// base64 `data:` URI.
#[derive(Debug, Clone)]
pub struct RecordImageResolver {
    records: Arc<RecordSet>,
    image_column: String,
    image_dir: PathBuf,
    mime: String,
}

impl RecordImageResolver {
    #[must_use]
    pub fn new(
        records: Arc<RecordSet>,
        image_column: impl Into<String>,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            records,
            image_column: image_column.into(),
            image_dir: image_dir.into(),
            mime: "image/png".to_owned(),
        }
    }

    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    /// File name of the first record matching every key.
    pub fn file_name(&self, keys: &[(&str, Scalar)]) -> ChartResult<String> {
        let matched = self
            .records
            .rows()
            .iter()
            .find(|row| keys.iter().all(|(column, value)| row.get(*column) == Some(value)))
            .and_then(|row| row.get(&self.image_column));

        match matched {
            Some(Scalar::Text(name)) if !name.is_empty() => Ok(name.clone()),
            _ => Err(ChartError::MissingImage {
                keys: describe_keys(keys),
            }),
        }
    }
}

impl ImageResolver for RecordImageResolver {
    fn resolve(&self, keys: &[(&str, Scalar)]) -> ChartResult<ImageRef> {
        let path = self.image_dir.join(self.file_name(keys)?);
        let bytes = std::fs::read(&path).map_err(|_| ChartError::MissingImage {
            keys: format!("{} ({})", describe_keys(keys), path.display()),
        })?;
        Ok(ImageRef::from_bytes(&self.mime, &bytes))
    }
}

fn describe_keys(keys: &[(&str, Scalar)]) -> String {
    let parts: Vec<String> = keys
        .iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect();
    parts.join(", ")
}
