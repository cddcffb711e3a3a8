/// Schema version written into every chain structure.
pub const STRUCTURE_VERSION: &str = "1.0";

/// Control points on a fresh curve.
pub const DEFAULT_CONTROL_POINT_COUNT: usize = 12;

/// Fewest control points a closed Catmull-Rom curve can interpolate.
pub const MIN_CONTROL_POINTS: usize = 3;

/// Default curve ellipse radius along X.
pub const DEFAULT_CURVE_RADIUS_X: f32 = 2.0;

/// Default curve ellipse radius along Z.
pub const DEFAULT_CURVE_RADIUS_Z: f32 = 2.5;

/// Lowest height of the flat chain above the table.
pub const MIN_CHAIN_HEIGHT: f32 = 0.2;

/// Clearance added above the largest bead radius.
pub const CHAIN_HEIGHT_MARGIN: f32 = 0.01;

/// Height of the default curve (sphere radius plus clearance).
pub const DEFAULT_CHAIN_HEIGHT: f32 = MIN_CHAIN_HEIGHT + CHAIN_HEIGHT_MARGIN;

/// Base size every shape radius is derived from.
pub const BASE_BEAD_SIZE: f32 = 0.2;

/// Color used for beads whose catalog entry is missing.
pub const DEFAULT_BEAD_COLOR: &str = "#FF6DAF";

/// Default nominal chain length in millimetres.
pub const DEFAULT_CHAIN_LENGTH: f32 = 200.0;

/// Default bead capacity of a chain.
pub const DEFAULT_MAX_BEADS: usize = 50;

/// Default nominal slot spacing in millimetres.
pub const DEFAULT_SLOT_SPACING: f32 = 4.0;
