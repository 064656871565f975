use std::path::PathBuf;

use yw_core::YwError;

/// Alias for `Result<T, SceneError>`.
pub type SceneResult<T> = Result<T, SceneError>;

/// Everything that can go wrong between reading the input files and
/// handing a finished scene to the engine. All of it is fatal.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A layout or definitions file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The layout extension is not one of the known formats.
    #[error("unsupported layout format: {} (expected .yaml, .yml, .json, .drawio or .xml)", path.display())]
    UnsupportedFormat {
        /// Offending file.
        path: PathBuf,
    },

    /// A file is not valid YAML, JSON, or draw.io XML.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    // Layout
    /// An arrow has no mover type.
    #[error("arrow \"{id}\" is not labelled; label every arrow with its mover type")]
    UnlabelledEdge {
        /// Arrow cell id.
        id: String,
    },

    /// An arrow's tail is not connected.
    #[error("arrow \"{id}\" has no source; connect both ends of every arrow to a process")]
    EdgeWithoutSource {
        /// Arrow cell id.
        id: String,
    },

    /// An arrow's head is not connected.
    #[error("arrow \"{id}\" has no target; connect both ends of every arrow to a process")]
    EdgeWithoutTarget {
        /// Arrow cell id.
        id: String,
    },

    /// A cell has an empty label.
    #[error("component \"{id}\" is not labelled")]
    UnlabelledCell {
        /// Cell id.
        id: String,
    },

    /// A container is neither a camera nor an ROI.
    #[error("container \"{id}\" is labelled \"{label}\"; containers must start with 'camera:' or 'roi:'")]
    BadContainerLabel {
        /// Container cell id.
        id: String,
        /// Its label.
        label: String,
    },

    /// An ROI's parent is not a camera.
    #[error("roi \"{id}\" is not nested inside a camera")]
    RoiOutsideCamera {
        /// ROI cell id.
        id: String,
    },

    /// A process, camera, or ROI has no size.
    #[error("component \"{id}\" has no width/height")]
    MissingGeometry {
        /// Cell id.
        id: String,
    },

    // Definitions
    /// The definitions file has the wrong top level keys.
    #[error("definitions have top level keys {found:?} but require [\"processes\", \"movers\"]")]
    TopLevelKeys {
        /// Keys present in the file.
        found: Vec<String>,
    },

    /// `processes` or `movers` is not a mapping.
    #[error("\"{section}\" must be a mapping of type names")]
    NotAMapping {
        /// Section name.
        section: String,
    },

    /// A process definition has the wrong keys.
    #[error("process \"{name}\" has keys {found:?} but requires \"time\" and at least one of \"input\" or \"output\"")]
    ProcessKeys {
        /// Process type.
        name: String,
        /// Keys present.
        found: Vec<String>,
    },

    /// An `input` or `output` key lists nothing.
    #[error("process \"{name}\" has an \"{key}\" key but nothing is listed under it")]
    EmptyItemList {
        /// Process type.
        name: String,
        /// `input` or `output`.
        key: String,
    },

    /// An `input` or `output` list is malformed.
    #[error("process \"{name}\" has an invalid \"{key}\" list: {message}")]
    InvalidItemList {
        /// Process type.
        name: String,
        /// `input` or `output`.
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// A process lists more than one output category.
    #[error("process \"{name}\" lists {count} output types; only one is supported")]
    TooManyOutputs {
        /// Process type.
        name: String,
        /// Output categories listed.
        count: usize,
    },

    /// A mover definition has the wrong keys.
    #[error("mover \"{name}\" has keys {found:?} but requires exactly \"speed\" and \"capacity\" (plus optional \"movement\")")]
    MoverKeys {
        /// Mover type.
        name: String,
        /// Keys present.
        found: Vec<String>,
    },

    /// A time, speed, or capacity is not positive.
    #[error("\"{key}\" of \"{name}\" must be a positive {expected}")]
    NotPositive {
        /// Process or mover type.
        name: String,
        /// Offending key.
        key: String,
        /// `integer` or `number`.
        expected: &'static str,
    },

    /// `movement` is neither `steer` nor `wander`.
    #[error("mover \"{name}\" has unknown movement \"{value}\" (expected steer or wander)")]
    UnknownMovement {
        /// Mover type.
        name: String,
        /// Value given.
        value: String,
    },

    /// A process label has no definition.
    #[error("process type \"{label}\" is used in the layout but not defined")]
    UndefinedProcess {
        /// The label.
        label: String,
    },

    /// A mover label has no definition.
    #[error("mover type \"{label}\" is used in the layout but not defined")]
    UndefinedMover {
        /// The label.
        label: String,
    },

    /// Assembling the scene failed.
    #[error(transparent)]
    Scene(#[from] YwError),
}
