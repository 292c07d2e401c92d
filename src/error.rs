// Error taxonomy for model building and transport. All variants are
// fatal: configuration and material errors abort before any batch runs,
// geometry errors abort the run at the batch in which they surface.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Invalid run parameters (particle, batch, or inactive counts).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Ambiguous or incomplete spatial partition. Batch 0 marks an error
    /// raised at model-build time, before any batch has run.
    #[error("geometry error (batch {batch}): {message}")]
    Geometry { batch: usize, message: String },

    /// A cell references a material index absent from the table.
    #[error("cell {cell} references unknown material {material}")]
    UnknownMaterial { cell: u32, material: usize },

    /// Material data failed validation at build time.
    #[error("invalid material {material}: {message}")]
    InvalidMaterial { material: u32, message: String },

    /// A batch banked no fission sites, so the next generation has no
    /// source to draw from.
    #[error("fission chain died in batch {batch}: no fission sites produced")]
    DeadFissionChain { batch: usize },
}

impl TransportError {
    pub fn geometry(batch: usize, message: String) -> Self {
        TransportError::Geometry { batch, message }
    }

    /// Attribute a geometry error to the batch in which it surfaced.
    /// Other variants are returned unchanged.
    pub fn with_batch(self, batch: usize) -> Self {
        match self {
            TransportError::Geometry { message, .. } => {
                TransportError::Geometry { batch, message }
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
