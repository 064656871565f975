//! Detection reporting for Yardwatch.
//!
//! Turns the camera and ROI detections of a simulated scene into the
//! `mdx-raw` / `mdx-frames` Elasticsearch dump consumed by the Metropolis
//! analytics stack, and rewrites the object classes of existing dumps.

/// The per-frame dump writer.
pub mod analytics;
/// Error types for report writing.
pub mod error;
/// Weighted class substitution in existing dumps.
pub mod replace;
/// Serializable document shapes.
pub mod schema;

pub use analytics::{Analytics, DEFAULT_PLACE, format_timestamp};
pub use error::{ReportError, ReportResult};
pub use replace::{Replaced, Replacer};
pub use schema::{ElkIndex, MdxFrames, MdxRaw};
