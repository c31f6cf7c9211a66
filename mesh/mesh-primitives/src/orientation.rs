//! Plane orientation labels for reporting.

use std::fmt;

use mesh_types::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A normal component above this magnitude makes the plane axis-aligned.
const AXIS_ALIGNED: f64 = 0.9;

/// Orientation of a plane, derived from its normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaneOrientation {
    /// Normal along Z: the plane lies in XY.
    Horizontal,
    /// Normal along X: the plane lies in YZ.
    VerticalYz,
    /// Normal along Y: the plane lies in XZ.
    VerticalXz,
    /// Anything else.
    Angled,
}

impl PlaneOrientation {
    /// Classify a unit normal by the magnitude of its components.
    ///
    /// Z is checked first, then X, then Y. The sign of the normal is ignored.
    #[must_use]
    pub fn classify(normal: &Vector3<f64>) -> Self {
        if normal.z.abs() > AXIS_ALIGNED {
            Self::Horizontal
        } else if normal.x.abs() > AXIS_ALIGNED {
            Self::VerticalYz
        } else if normal.y.abs() > AXIS_ALIGNED {
            Self::VerticalXz
        } else {
            Self::Angled
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal (XY)",
            Self::VerticalYz => "vertical (YZ)",
            Self::VerticalXz => "vertical (XZ)",
            Self::Angled => "angled",
        }
    }
}

impl fmt::Display for PlaneOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
