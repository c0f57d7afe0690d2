use std::ops::ControlFlow;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum SlipError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Failed to open source document: {0}")]
    SourceLoad(String),
    #[error("Failed to render page {page}: {message}")]
    PageRender { page: usize, message: String },
    #[error("Source document has {found} pages, at least {required} required")]
    TooFewPages { found: usize, required: usize },
    #[error("Unsupported template image format (expected PNG or JPEG)")]
    UnsupportedTemplate,
    #[error("Invalid image data for slip {id}: {message}")]
    InvalidCropData { id: String, message: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("No slips to compose")]
    NoRecords,
    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SlipError>;

/// Output layout policy, fixed for a whole composition run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LayoutMode {
    /// One slip per page, page sized to the template
    #[default]
    Single,
    /// Four slips per A4 page in a 2×2 grid
    Grid4,
}

impl LayoutMode {
    pub fn slips_per_page(self) -> usize {
        match self {
            LayoutMode::Single => 1,
            LayoutMode::Grid4 => 4,
        }
    }

    /// Number of output pages needed for `record_count` slips
    pub fn page_count(self, record_count: usize) -> usize {
        record_count.div_ceil(self.slips_per_page())
    }
}

/// One cropped record taken from the source document.
///
/// `image_data` is a self-contained `data:image/jpeg;base64,...` URI.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlipRecord {
    /// `v-{page}-{candidate}`
    pub id: String,
    pub image_data: String,
    /// 1-based page of the source document
    pub page_number: usize,
}

impl SlipRecord {
    /// Decode the embedded JPEG bytes
    pub fn jpeg_bytes(&self) -> Result<Vec<u8>> {
        crate::extract::decode_data_uri(&self.image_data).map_err(|message| {
            SlipError::InvalidCropData {
                id: self.id.clone(),
                message,
            }
        })
    }
}

/// Pipeline stage reported through progress callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Compose,
}

/// Progress notification. Returning `ControlFlow::Break` from the
/// callback cancels the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,
    pub current: usize,
    pub total: usize,
}

/// Progress callback that never cancels
pub fn ignore_progress(_: Progress) -> ControlFlow<()> {
    ControlFlow::Continue(())
}

pub(crate) fn report<F>(on_progress: &mut F, stage: Stage, current: usize, total: usize) -> Result<()>
where
    F: FnMut(Progress) -> ControlFlow<()>,
{
    match on_progress(Progress {
        stage,
        current,
        total,
    }) {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(()) => {
            log::info!("{:?} cancelled at {}/{}", stage, current, total);
            Err(SlipError::Cancelled)
        }
    }
}
