//! The diagram side of a scene: a flat list of labelled cells.

use std::collections::HashSet;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use yw_core::Rect;

use crate::error::{SceneError, SceneResult};

const CAMERA_PREFIX: &str = "camera:";
const ROI_PREFIX: &str = "roi:";

/// One element of the diagram: a box, a container, or an arrow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique id; becomes the id of the scene object built from this cell.
    pub id: String,
    /// Text label.
    #[serde(default)]
    pub value: Option<String>,
    /// Left edge; defaults to 0.
    #[serde(default)]
    pub x: Option<f64>,
    /// Top edge; defaults to 0.
    #[serde(default)]
    pub y: Option<f64>,
    /// Width; required for processes, cameras, and ROIs.
    #[serde(default)]
    pub width: Option<f64>,
    /// Height; required for processes, cameras, and ROIs.
    #[serde(default)]
    pub height: Option<f64>,
    /// Marks the cell as an arrow.
    #[serde(default)]
    pub edge: bool,
    /// Id of the cell an arrow starts at.
    #[serde(default)]
    pub source: Option<String>,
    /// Id of the cell an arrow ends at.
    #[serde(default)]
    pub target: Option<String>,
    /// `;`-separated style flags, e.g. `swimlane`.
    #[serde(default)]
    pub style: Option<String>,
    /// Id of the enclosing container.
    #[serde(default)]
    pub parent: Option<String>,
}

impl Cell {
    /// The label, or `""` when there is none.
    pub fn label(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// `true` for arrows, connected or not.
    pub fn is_edge(&self) -> bool {
        self.edge || self.source.is_some() || self.target.is_some()
    }

    /// `true` for a container cell.
    pub fn is_swimlane(&self) -> bool {
        self.style
            .as_deref()
            .is_some_and(|style| style.split(';').any(|flag| flag.trim() == "swimlane"))
    }

    /// Footprint of the cell. Missing coordinates default to zero; a missing
    /// size means the cell has no geometry.
    pub fn rect(&self) -> Option<Rect> {
        Some(Rect::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.width?,
            self.height?,
        ))
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        let label = self.label();
        label
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    /// `true` if the label marks this cell as a camera.
    pub fn is_camera(&self) -> bool {
        self.has_prefix(CAMERA_PREFIX)
    }

    /// `true` if the label marks this cell as an ROI.
    pub fn is_roi(&self) -> bool {
        self.has_prefix(ROI_PREFIX)
    }

    /// Label of a camera or ROI: the text after the first colon.
    pub fn sensor_label(&self) -> &str {
        self.label()
            .split_once(':')
            .map_or("", |(_, rest)| rest.trim())
    }
}

/// Cells sorted by the scene object they describe, in layout order.
#[derive(Debug, Default)]
pub struct Categorized<'a> {
    /// Arrow endpoints.
    pub processes: Vec<&'a Cell>,
    /// Arrows with both ends connected.
    pub movers: Vec<&'a Cell>,
    /// Cells labelled `camera:`.
    pub cameras: Vec<&'a Cell>,
    /// Cells labelled `roi:`.
    pub rois: Vec<&'a Cell>,
}

/// A scene diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// World width.
    pub width: f64,
    /// World height.
    pub height: f64,
    /// Every cell, in diagram order.
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Layout {
    /// Read a layout, choosing YAML, JSON, or draw.io XML by file extension.
    pub fn load(path: &Path) -> SceneResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| SceneError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or("")
            .to_lowercase();

        let layout: Self = if ext == "yaml" || ext == "yml" {
            serde_yaml::from_str(&contents).map_err(|err| SceneError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?
        } else if ext == "json" {
            serde_json::from_str(&contents).map_err(|err| SceneError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?
        } else if ext == "drawio" || ext == "xml" {
            crate::drawio::parse(path, &contents)?
        } else {
            return Err(SceneError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        };

        info!("loaded layout {} ({} cells)", path.display(), layout.cells.len());
        Ok(layout)
    }

    /// Look up a cell by id.
    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Sort cells into processes, movers, cameras, and ROIs.
    ///
    /// Any cell with both ends connected is a mover and both ends are
    /// processes, whatever their labels say. Remaining cells are cameras or
    /// ROIs by label prefix; everything else is decoration.
    pub fn categorize(&self) -> Categorized<'_> {
        let mut out = Categorized::default();
        let mut endpoints = HashSet::new();

        for cell in &self.cells {
            if let (Some(source), Some(target)) = (&cell.source, &cell.target) {
                out.movers.push(cell);
                endpoints.insert(source.as_str());
                endpoints.insert(target.as_str());
            }
        }

        for cell in &self.cells {
            if endpoints.contains(cell.id.as_str()) {
                out.processes.push(cell);
            } else if cell.is_camera() {
                out.cameras.push(cell);
            } else if cell.is_roi() {
                out.rois.push(cell);
            }
        }
        out
    }

    /// Reject diagrams that cannot become a scene.
    pub fn check(&self) -> SceneResult<()> {
        for cell in &self.cells {
            if cell.is_edge() {
                if cell.label().trim().is_empty() {
                    return Err(SceneError::UnlabelledEdge {
                        id: cell.id.clone(),
                    });
                }
                if cell.source.is_none() {
                    return Err(SceneError::EdgeWithoutSource {
                        id: cell.id.clone(),
                    });
                }
                if cell.target.is_none() {
                    return Err(SceneError::EdgeWithoutTarget {
                        id: cell.id.clone(),
                    });
                }
            }

            if cell.value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(SceneError::UnlabelledCell {
                    id: cell.id.clone(),
                });
            }

            if cell.is_swimlane() && !(cell.is_camera() || cell.is_roi()) {
                return Err(SceneError::BadContainerLabel {
                    id: cell.id.clone(),
                    label: cell.label().to_string(),
                });
            }
        }

        let cats = self.categorize();
        for cell in cats.processes.iter().chain(&cats.cameras).chain(&cats.rois) {
            if cell.rect().is_none() {
                return Err(SceneError::MissingGeometry {
                    id: cell.id.clone(),
                });
            }
        }
        for roi in &cats.rois {
            let in_camera = roi
                .parent
                .as_deref()
                .is_some_and(|parent| cats.cameras.iter().any(|cam| cam.id == parent));
            if !in_camera {
                return Err(SceneError::RoiOutsideCamera { id: roi.id.clone() });
            }
        }

        info!(
            "layout verified: {} processes, {} movers, {} cameras, {} rois",
            cats.processes.len(),
            cats.movers.len(),
            cats.cameras.len(),
            cats.rois.len()
        );
        Ok(())
    }
}
