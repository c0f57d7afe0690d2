//! Persisted setup blobs
//!
//! Two independent JSON documents: the extraction setup (unit rectangles plus
//! the zoom they were drawn at) and the letter mapping rectangle. A bundle
//! combines both for export/import. The core never reads these itself; the
//! caller loads a value before a run and stores it after an edit.

use crate::constants::DEFAULT_ZOOM;
use crate::geometry::{Rect, UnitRectSet, Zoom};
use crate::types::{Result, SlipError};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Slip position on the letter template, in template pixels (top-left origin)
pub type LetterMapping = Rect;

/// Mapping rectangle used when none has been drawn yet
pub const DEFAULT_MAPPING: LetterMapping = Rect {
    x: 14.0,
    y: 363.0,
    width: 328.0,
    height: 150.0,
};

/// Reference slot layout of the voter roll the tool was tuned on
const REFERENCE_UNIT_RECTS: [[f64; 4]; 15] = [
    [66.45161290322578, 112.79569810436614, 235.80645161290315, 79.67741935483869],
    [303.97849790511583, 113.44085939468873, 235.16129032258058, 79.3548387096774],
    [539.8924796811995, 113.44085939468873, 235.80645161290315, 79.0322580645161],
    [66.77419354838707, 194.30107855027717, 234.83870967741927, 79.0322580645161],
    [304.19354838709666, 194.62365919543845, 234.516129032258, 79.0322580645161],
    [540.537640971522, 194.62365919543845, 234.83870967741927, 78.38709677419352],
    [66.8817187893775, 275.16129032258056, 235.16129032258058, 79.3548387096774],
    [303.8709677419354, 275.48387096774184, 234.83870967741927, 79.0322580645161],
    [540.537640971522, 275.48387096774184, 235.16129032258058, 79.0322580645161],
    [66.5591381442162, 356.021511939264, 235.48387096774186, 79.3548387096774],
    [304.19354838709666, 356.3440925844253, 234.516129032258, 79.67741935483869],
    [540.3225806451611, 356.6666732295866, 234.83870967741927, 78.70967741935482],
    [66.77419354838707, 437.7419354838708, 234.83870967741927, 78.70967741935482],
    [304.19354838709666, 437.09677419354824, 234.516129032258, 79.67741935483869],
    [540.537640971522, 437.09677419354824, 235.16129032258058, 79.99999999999997],
];

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

/// Unit rectangles and the display zoom they were last edited at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSetup {
    #[serde(default)]
    pub unit_rects: UnitRectSet,
    #[serde(default = "default_zoom")]
    pub saved_zoom: f64,
}

impl Default for ExtractionSetup {
    fn default() -> Self {
        Self {
            unit_rects: REFERENCE_UNIT_RECTS
                .iter()
                .map(|&[x, y, width, height]| Rect::new(x, y, width, height))
                .collect(),
            saved_zoom: DEFAULT_ZOOM,
        }
    }
}

impl ExtractionSetup {
    pub fn zoom(&self) -> Zoom {
        Zoom::new(self.saved_zoom)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let setup: Self = load_json(path).await?;
        setup.unit_rects.validate()?;
        Ok(setup)
    }

    /// Load, falling back to the reference setup when the file is missing
    /// or unreadable
    pub async fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path).await {
            Ok(setup) => setup,
            Err(e) => {
                log::warn!(
                    "Using default extraction setup ({}: {})",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_json(self, path).await
    }
}

/// Combined export of both setups
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetupBundle {
    #[serde(default)]
    pub voter: Option<ExtractionSetup>,
    #[serde(default)]
    pub letter: Option<LetterMapping>,
}

impl SetupBundle {
    /// Conventional export file name
    pub const FILE_NAME: &'static str = "Voter_Setup_Master.json";

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bundle: Self = load_json(path).await?;
        if let Some(voter) = &bundle.voter {
            voter.unit_rects.validate()?;
        }
        Ok(bundle)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_json(self, path).await
    }

    /// Extraction setup, or the reference one
    pub fn voter_or_default(&self) -> ExtractionSetup {
        self.voter.clone().unwrap_or_default()
    }

    /// Mapping rectangle, or the default one
    pub fn letter_or_default(&self) -> LetterMapping {
        self.letter.unwrap_or(DEFAULT_MAPPING)
    }
}

/// Load a standalone mapping rectangle
pub async fn load_mapping(path: impl AsRef<Path>) -> Result<LetterMapping> {
    load_json(path).await
}

/// Save a standalone mapping rectangle
pub async fn save_mapping(mapping: &LetterMapping, path: impl AsRef<Path>) -> Result<()> {
    save_json(mapping, path).await
}

async fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SlipError::Config(format!("Failed to parse config: {}", e)))
}

async fn save_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| SlipError::Config(format!("Failed to serialize config: {}", e)))?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
