//! Shared defaults for the diagram engine.

/// Pointer-to-edge distance (canvas units) within which an edge counts as hit.
pub const EDGE_HIT_TOLERANCE: f64 = 10.0;

/// Default coalescing delay for non-name property edits.
pub const PROPERTY_DEBOUNCE_MS: u64 = 500;

/// Lower and upper bound accepted for the property coalescing delay.
pub const PROPERTY_DEBOUNCE_RANGE_MS: (u64, u64) = (300, 750);

/// Minimum spacing between two load confirmations.
pub const CONFIRMATION_INTERVAL_MS: u64 = 2500;

/// Default size of a regular node.
pub const REGULAR_DEFAULT_SIZE: (f64, f64) = (150.0, 80.0);

/// Smallest size a regular node can be resized to.
pub const REGULAR_MIN_SIZE: (f64, f64) = (60.0, 40.0);

/// Default size of a container node.
pub const CONTAINER_DEFAULT_SIZE: (f64, f64) = (300.0, 300.0);

/// Smallest size a container node can be resized to.
pub const CONTAINER_MIN_SIZE: (f64, f64) = (200.0, 200.0);

/// Extent of the square used for randomized default placement.
pub const PLACEMENT_EXTENT: f64 = 500.0;

/// Zoom limits for the camera.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;

/// Name given to documents created without one.
pub const DEFAULT_DOCUMENT_NAME: &str = "Untitled";

/// External identity sentinel meaning "start a new document".
pub const NEW_DOCUMENT_SENTINEL: &str = "new";
