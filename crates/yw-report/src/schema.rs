//! Document shapes of the `mdx-raw` and `mdx-frames` indices.
//!
//! Field names and defaults follow the Metropolis MDX 4.0 schema so dumps can
//! be bulk-loaded into Elasticsearch unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Schema version stamped on every document.
pub const MDX_VERSION: &str = "4.0";

/// One line of an Elasticsearch dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElkIndex<S> {
    /// Target index, e.g. `mdx-raw-2024-05-01`.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document type; always `logs`.
    #[serde(rename = "_type")]
    pub kind: String,
    /// Random document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Search score; always 1.
    #[serde(rename = "_score")]
    pub score: u32,
    /// The document itself.
    #[serde(rename = "_source")]
    pub source: S,
}

impl<S> ElkIndex<S> {
    /// Wrap a document for the given index with a fresh random id.
    pub fn new(index: impl Into<String>, source: S) -> Self {
        Self {
            index: index.into(),
            kind: "logs".to_string(),
            id: uuid::Uuid::new_v4().to_string(),
            score: 1,
            source,
        }
    }
}

/// Image-space bounding box. The simulator has no camera model, so every
/// object reports the same fixed box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BBox {
    /// Left edge in pixels.
    pub left_x: f64,
    /// Bottom edge in pixels.
    pub bottom_y: f64,
    /// Top edge in pixels.
    pub top_y: f64,
    /// Right edge in pixels.
    pub right_x: f64,
}

impl Default for BBox {
    fn default() -> Self {
        Self {
            left_x: 0.0,
            bottom_y: 0.0,
            top_y: 100.0,
            right_x: 100.0,
        }
    }
}

/// A detected object in an `mdx-raw` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdxObject {
    /// Image-space box.
    pub bbox: BBox,
    /// Id of the detected item.
    pub id: String,
    /// Object class, the item category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Detection confidence in `0..=1`.
    pub confidence: f64,
    /// Heading; unused.
    pub dir: Vec<f64>,
    /// Re-identification embedding; unused.
    pub embedding: Option<f64>,
    /// Pose estimate; unused.
    pub pose: Option<f64>,
    /// Lip activity; unused.
    pub lip_activity: Option<String>,
    /// Speed estimate; always 0.
    pub speed: f64,
    /// Free-form attributes.
    pub info: BTreeMap<String, String>,
    /// World coordinate; unused.
    pub coordinate: Option<String>,
    /// Gaze estimate; unused.
    pub gaze: Option<String>,
    /// Geo location; unused.
    pub location: Option<String>,
}

impl MdxObject {
    /// A fully confident detection of `id` with type `kind`.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            bbox: BBox::default(),
            id: id.into(),
            kind: kind.into(),
            confidence: 1.0,
            dir: Vec::new(),
            embedding: None,
            pose: None,
            lip_activity: None,
            speed: 0.0,
            info: BTreeMap::new(),
            coordinate: None,
            gaze: None,
            location: None,
        }
    }
}

/// Per-camera list of everything seen on one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdxRaw {
    /// Frame time, see [`format_timestamp`](crate::format_timestamp).
    pub timestamp: String,
    /// Frame number.
    pub id: String,
    /// Camera label.
    pub sensor_id: String,
    /// Everything the camera sees.
    pub objects: Vec<MdxObject>,
    /// Always `mdx-raw`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Schema version.
    pub version: String,
}

/// A world-space position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Height; always 0.
    pub z: f64,
}

/// Count of one object type in a camera's whole field of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fov {
    /// Always empty.
    pub id: String,
    /// Center of each object.
    pub coordinates: Vec<Coordinates>,
    /// Number of objects.
    pub count: usize,
    /// Ids of the objects.
    pub ids: Vec<String>,
    /// Object class.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Count, ids, and positions of one object type inside one ROI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiCount {
    /// ROI label.
    pub id: String,
    /// Center of each object.
    pub coordinates: Vec<Coordinates>,
    /// Number of objects.
    pub count: usize,
    /// Ids of the objects.
    pub ids: Vec<String>,
    /// Object class.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Per-camera summary of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdxFrames {
    /// Frame time.
    pub timestamp: String,
    /// Per-class counts over the whole view.
    pub fov: Vec<Fov>,
    /// Per-class counts per ROI.
    pub rois: Vec<RoiCount>,
    /// Schema version.
    pub version: String,
    /// Camera label.
    pub sensor_id: String,
    /// Always empty.
    pub objects: Vec<serde_json::Value>,
    /// Frame number.
    pub id: String,
    /// Carries the `place` string.
    pub info: BTreeMap<String, String>,
    /// Always `mdx-frames`.
    #[serde(rename = "type")]
    pub kind: String,
}
