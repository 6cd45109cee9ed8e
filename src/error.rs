//! Error and warning types for skin generation

use thiserror::Error;

/// Result alias used throughout the library
pub type SkinResult<T> = Result<T, SkinError>;

/// Errors that abort a skin build
#[derive(Debug, Error)]
pub enum SkinError {
    /// A shape option is missing or out of range
    #[error("invalid configuration for `{option}`: {reason}")]
    Configuration {
        option: &'static str,
        reason: String,
    },

    /// An edge joins a vertex to itself
    #[error("edge {edge} is a self-loop on vertex {vertex}")]
    SelfLoop { edge: usize, vertex: usize },

    /// An edge references a vertex that does not exist
    #[error("edge {edge} references vertex {vertex}, but the wireframe has {count} vertices")]
    VertexOutOfRange {
        edge: usize,
        vertex: usize,
        count: usize,
    },

    /// A wireframe vertex has a NaN or infinite coordinate
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex { vertex: usize },

    /// A connector could not find the profile an endpoint cap should have built
    #[error("no profile for edge {edge} on the cap of vertex {vertex}")]
    MissingProfile { edge: usize, vertex: usize },

    /// Malformed wireframe input
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SkinError {
    pub fn configuration(option: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            option,
            reason: reason.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Degenerate geometry that was handled with a fallback
///
/// These never stop a build; they are collected in the build report and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryWarning {
    /// Incident edge directions cancel out, so the cap normal came from a fallback
    #[error("vertex {vertex}: incident edges cancel out, using fallback cap normal")]
    AmbiguousNormal { vertex: usize },

    /// Edge has (near) zero length
    #[error("vertex {vertex}: edge {edge} has zero length, using fallback tangent")]
    DegenerateEdge { vertex: usize, edge: usize },

    /// The profile's up reference was parallel to the edge and had to be perturbed
    #[error("vertex {vertex}: profile frame on edge {edge} is parallel to the edge, perturbed")]
    ParallelProfileFrame { vertex: usize, edge: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = SkinError::configuration("outside_radius", "not set and no `radius` fallback");
        assert_eq!(
            err.to_string(),
            "invalid configuration for `outside_radius`: not set and no `radius` fallback"
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = GeometryWarning::AmbiguousNormal { vertex: 3 };
        assert!(warning.to_string().starts_with("vertex 3:"));
    }
}
