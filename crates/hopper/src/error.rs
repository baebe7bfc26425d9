use thiserror::Error;

/// Validation failures raised when building a workstation configuration.
///
/// A configuration that fails to build never reaches a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The builder was given an empty id.
    #[error("workstation id is required")]
    MissingId,
    /// The builder declared no block materials.
    #[error("at least one material is required for workstation `{id}`")]
    NoMaterials {
        /// Id of the rejected configuration.
        id: String,
    },
}
