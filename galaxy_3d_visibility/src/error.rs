//! Error types for the visibility core
//!
//! Only construction-time mistakes are errors: malformed portals, degenerate
//! sector bounds, unknown keys. Per-frame conditions (a node outside every
//! sector, a camera that was never placed) are logged and degrade to empty
//! results instead.

use std::fmt;

/// Result type for visibility core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Visibility core errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Sector key unknown, or sector bounds/depth rejected
    InvalidSector(String),

    /// Portal references a missing sector or is otherwise malformed
    InvalidPortal(String),

    /// Scene node key unknown or node lacks a required capability
    InvalidSceneNode(String),

    /// Any other rejected argument
    InvalidParameter(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSector(msg) => write!(f, "Invalid sector: {}", msg),
            Error::InvalidPortal(msg) => write!(f, "Invalid portal: {}", msg),
            Error::InvalidSceneNode(msg) => write!(f, "Invalid scene node: {}", msg),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error and build it.
///
/// ```ignore
/// let err = engine_err!(InvalidPortal, "galaxy3d::SectorGroup", "sector {:?} not found", key);
/// let err = engine_err!("galaxy3d::Octree", "depth {} too large", depth); // InvalidParameter
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:literal, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
    ($source:literal, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidParameter(message)
    }};
}

/// Log an error and return it from the current function.
#[macro_export]
macro_rules! engine_bail {
    ($($arg:tt)*) => {
        return Err($crate::engine_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
