//! EXIF orientation and the rotation applied to correct it.
//!
//! Only the pure rotations (EXIF 3, 6 and 8) are corrected. The four mirrored
//! orientations are left as stored.
//!
//! ```text
//!     EXIF orientations:
//!
//!     1: Identity    2: FlipH       3: Rotate180   4: FlipV
//!     5: Transpose   6: Rotate90    7: Transverse  8: Rotate270
//!
//!     corrected:     3 → rotate 180°
//!                    6 → rotate 90° clockwise, swap width/height
//!                    8 → rotate 270° clockwise, swap width/height
//! ```

/// Clockwise rotation applied by the raster engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    /// 90 degrees clockwise.
    Rotate90,
    /// 180 degrees.
    Rotate180,
    /// 270 degrees clockwise (90 counter-clockwise).
    Rotate270,
}

impl Rotation {
    /// Rotation for a number of clockwise quarter turns. `None` for a
    /// multiple of four.
    pub fn from_quarter_turns(turns: u8) -> Option<Self> {
        match turns & 3 {
            1 => Some(Self::Rotate90),
            2 => Some(Self::Rotate180),
            3 => Some(Self::Rotate270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 => 270,
        }
    }

    /// Whether width and height trade places.
    pub fn swaps_axes(self) -> bool {
        self != Self::Rotate180
    }
}

/// Image orientation as an element of the D4 dihedral group: a clockwise
/// rotation in quarter turns, optionally followed by a horizontal flip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Orientation {
    /// Quarter turns clockwise (0-3).
    pub rotation: u8,
    /// Horizontal flip after rotation.
    pub flip: bool,
}

impl Orientation {
    /// EXIF 1.
    pub const IDENTITY: Self = Self::new(0, false);
    /// EXIF 2.
    pub const FLIP_H: Self = Self::new(0, true);
    /// EXIF 3.
    pub const ROTATE_180: Self = Self::new(2, false);
    /// EXIF 4.
    pub const FLIP_V: Self = Self::new(2, true);
    /// EXIF 5.
    pub const TRANSPOSE: Self = Self::new(1, true);
    /// EXIF 6.
    pub const ROTATE_90: Self = Self::new(1, false);
    /// EXIF 7.
    pub const TRANSVERSE: Self = Self::new(3, true);
    /// EXIF 8.
    pub const ROTATE_270: Self = Self::new(3, false);

    /// Indexed by EXIF value - 1.
    const BY_EXIF: [Self; 8] = [
        Self::IDENTITY,
        Self::FLIP_H,
        Self::ROTATE_180,
        Self::FLIP_V,
        Self::TRANSPOSE,
        Self::ROTATE_90,
        Self::TRANSVERSE,
        Self::ROTATE_270,
    ];

    const fn new(rotation: u8, flip: bool) -> Self {
        Self { rotation, flip }
    }

    /// From an EXIF orientation tag (1-8). `None` for 0 (absent) and
    /// out-of-range values.
    pub fn from_exif(value: u8) -> Option<Self> {
        if (1..=8).contains(&value) {
            Some(Self::BY_EXIF[(value - 1) as usize])
        } else {
            None
        }
    }

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    pub fn is_mirrored(self) -> bool {
        self.flip
    }

    /// Whether this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.rotation % 2 == 1
    }

    /// Rotation that brings the stored pixels upright.
    ///
    /// Mirrored orientations get no correction at all, not even their
    /// rotational part.
    pub fn correction(self) -> OrientationCorrection {
        if self.is_mirrored() {
            return OrientationCorrection::NONE;
        }
        let rotation = Rotation::from_quarter_turns(self.rotation);
        OrientationCorrection {
            rotation,
            swap_dimensions: rotation.is_some_and(Rotation::swaps_axes),
        }
    }
}

/// What to do about an image's stored orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationCorrection {
    /// Rotation to apply before cropping. `None` leaves pixels as stored.
    pub rotation: Option<Rotation>,
    /// Probed width and height must be exchanged before layout.
    pub swap_dimensions: bool,
}

impl OrientationCorrection {
    /// Leave the image as stored.
    pub const NONE: Self = Self {
        rotation: None,
        swap_dimensions: false,
    };

    pub fn is_none(&self) -> bool {
        self.rotation.is_none()
    }
}

/// Correction for a raw EXIF orientation code. Codes other than 3, 6 and 8
/// (including 0 for "no tag") need none.
pub fn resolve(code: u8) -> OrientationCorrection {
    Orientation::from_exif(code).map_or(OrientationCorrection::NONE, Orientation::correction)
}
