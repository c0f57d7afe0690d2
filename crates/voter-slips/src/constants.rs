//! Shared constants for slip extraction and composition
//!
//! Most of these are tuned to one reference voter roll; the grid fractions
//! and the offset quirk in particular are fits to that document.

// =============================================================================
// Authoring Space
// =============================================================================

/// Magnification at which unit rectangles are authored (pt → px)
pub const REFERENCE_MAGNIFICATION: f64 = 1.33;

/// Base page width in authoring units (A4 at the reference magnification)
pub const BASE_PAGE_WIDTH: f64 = A4_WIDTH_PT * REFERENCE_MAGNIFICATION;

/// Base page height in authoring units
pub const BASE_PAGE_HEIGHT: f64 = A4_HEIGHT_PT * REFERENCE_MAGNIFICATION;

// =============================================================================
// Display Zoom
// =============================================================================

pub const DEFAULT_ZOOM: f64 = 1.1;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.2;

/// Drawn rectangles this narrow (display units) or narrower are discarded
pub const MIN_DRAWN_WIDTH: f64 = 5.0;

/// Template previews wider than this are downscaled for mapping
pub const TEMPLATE_PREVIEW_MAX_WIDTH: f64 = 800.0;

// =============================================================================
// Slot Grid
// =============================================================================

pub const GRID_COLUMNS: usize = 3;
pub const GRID_LEFT_FRACTION: f64 = 0.04;
pub const GRID_WIDTH_FRACTION: f64 = 0.92;
pub const GRID_H_GAP: f64 = 12.0;
pub const GRID_V_GAP: f64 = 10.0;

pub const GRID_TOP_FRACTION_5_ROWS: f64 = 0.17;
pub const GRID_TOP_FRACTION_6_ROWS: f64 = 0.05;
pub const GRID_HEIGHT_FRACTION_5_ROWS: f64 = 0.79;
pub const GRID_HEIGHT_FRACTION_6_ROWS: f64 = 0.91;

// =============================================================================
// Extraction
// =============================================================================

/// Render scale used for cropping (288 DPI)
pub const EXTRACTION_SCALE: f64 = 4.0;

/// Pages before this one are cover/header pages
pub const FIRST_SLIP_PAGE: usize = 3;

/// Offset correction only kicks in from this page on
pub const OFFSET_CORRECTION_FIRST_PAGE: usize = 4;

/// Offset correction only applies to sets of exactly this many slots
pub const OFFSET_CORRECTION_SLOT_COUNT: usize = 15;

/// Number of leading slots duplicated by the offset correction
pub const OFFSET_CORRECTION_ROW_LEN: usize = 3;

pub const JPEG_QUALITY: u8 = 95;

pub const ENHANCE_CONTRAST: f32 = 1.1;
pub const ENHANCE_BRIGHTNESS: f32 = 1.05;

// =============================================================================
// Content Presence
// =============================================================================

/// Mean channel value below which a pixel counts as ink
pub const DARK_LUMINANCE_THRESHOLD: u8 = 200;

/// Fraction of the rectangle area that must be dark
pub const OCCUPIED_DENSITY: f64 = 0.005;

/// Inset in authoring units, scaled by the extraction factor
pub const PRESENCE_MARGIN: f64 = 5.0;

// =============================================================================
// Composition
// =============================================================================

pub const A4_WIDTH_PT: f64 = 595.0;
pub const A4_HEIGHT_PT: f64 = 842.0;

/// Gap around and between grid4 slots (points)
pub const GRID4_PADDING: f64 = 10.0;

/// Progress is reported every this many records in single mode
pub const SINGLE_PROGRESS_INTERVAL: usize = 10;

/// Progress is reported every this many records in grid4 mode
pub const GRID4_PROGRESS_INTERVAL: usize = 8;
