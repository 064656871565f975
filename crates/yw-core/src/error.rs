use crate::entity::{EntityId, EntityKind};

/// Alias for `Result<T, YwError>`.
pub type YwResult<T> = Result<T, YwError>;

/// Errors raised while assembling a scene.
///
/// Once a scene is assembled nothing in the tick loop can fail.
#[derive(Debug, thiserror::Error)]
pub enum YwError {
    /// An object with the same id is already part of the scene.
    #[error("{kind} with id \"{id}\" already exists")]
    DuplicateId {
        /// The kind of the rejected object.
        kind: EntityKind,
        /// The clashing id.
        id: EntityId,
    },

    /// A mover references a process the scene does not hold.
    #[error("mover \"{mover}\" references unknown process \"{process}\"")]
    UnknownProcess {
        /// The mover carrying the dangling reference.
        mover: EntityId,
        /// The missing process id.
        process: EntityId,
    },

    /// An ROI references a camera the scene does not hold.
    #[error("roi \"{roi}\" references unknown camera \"{camera}\"")]
    UnknownCamera {
        /// The ROI carrying the dangling reference.
        roi: EntityId,
        /// The missing camera id.
        camera: EntityId,
    },
}
