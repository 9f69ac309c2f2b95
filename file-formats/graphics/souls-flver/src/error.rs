use std::fmt;

use thiserror::Error;

/// Stage of the model parse an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Fixed 0x80-byte header
    Header,
    /// Dummy records
    Dummies,
    /// Material records and their GX lists
    Materials,
    /// Bone records
    Bones,
    /// Mesh records
    Meshes,
    /// Face set records and index data
    FaceSets,
    /// Vertex buffer records
    VertexBuffers,
    /// Buffer layouts and their members
    BufferLayouts,
    /// Texture records
    Textures,
    /// Trailing extension record
    Extension,
    /// Handing textures, face sets and vertex buffers to their owners
    Distribution,
    /// Decoding vertex data
    Vertices,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Header => "header",
            Self::Dummies => "dummies",
            Self::Materials => "materials",
            Self::Bones => "bones",
            Self::Meshes => "meshes",
            Self::FaceSets => "face sets",
            Self::VertexBuffers => "vertex buffers",
            Self::BufferLayouts => "buffer layouts",
            Self::Textures => "textures",
            Self::Extension => "extension",
            Self::Distribution => "distribution",
            Self::Vertices => "vertices",
        };
        f.write_str(name)
    }
}

/// Errors raised while reading a FLVER model
#[derive(Error, Debug)]
pub enum FlverError {
    /// Malformed or truncated data
    #[error(transparent)]
    Data(#[from] souls_data::Error),

    /// Pool entries that no owner claimed
    #[error("Orphaned {kind} found: {indices:?}")]
    Orphaned {
        /// Pool name
        kind: &'static str,
        /// Unclaimed indices
        indices: Vec<usize>,
    },

    /// An owner referenced an entry that is missing or was already claimed
    #[error("{kind} not found or already taken: {index}")]
    MissingReference {
        /// Pool name
        kind: &'static str,
        /// Referenced index
        index: i64,
    },

    /// A vertex buffer's stride disagrees with its layout
    #[error("Vertex buffer {buffer} has stride {stride}, but its layout is {layout_size} bytes")]
    StrideMismatch {
        /// Position of the buffer within its mesh
        buffer: usize,
        /// Declared vertex size
        stride: usize,
        /// Sum of the layout member sizes
        layout_size: usize,
    },

    /// Any other broken cross-record invariant
    #[error("{0}")]
    Structural(String),

    /// Valid data this reader cannot decode
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// An error annotated with the parse phase that raised it
    #[error("Failed reading {phase}: {source}")]
    Phase {
        /// Parse phase
        phase: Phase,
        /// Underlying error
        #[source]
        source: Box<FlverError>,
    },
}

impl FlverError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// The error with any phase annotations stripped
    pub fn root(&self) -> &Self {
        match self {
            Self::Phase { source, .. } => source.root(),
            other => other,
        }
    }

    /// The outermost phase annotation, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Whether the file contradicts itself, as opposed to being merely unsupported
    pub fn is_structural(&self) -> bool {
        matches!(
            self.root(),
            Self::Orphaned { .. }
                | Self::MissingReference { .. }
                | Self::StrideMismatch { .. }
                | Self::Structural(_)
        )
    }
}

/// Result type for FLVER reading
pub type Result<T> = std::result::Result<T, FlverError>;

pub(crate) trait PhaseExt<T> {
    fn phase(self, phase: Phase) -> Result<T>;
}

impl<T, E: Into<FlverError>> PhaseExt<T> for std::result::Result<T, E> {
    fn phase(self, phase: Phase) -> Result<T> {
        self.map_err(|e| FlverError::Phase {
            phase,
            source: Box::new(e.into()),
        })
    }
}

/// Convert a stored count or offset, rejecting negative values
pub(crate) fn to_usize(value: i32, field: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| FlverError::structural(format!("Negative {field}: {value}")))
}
