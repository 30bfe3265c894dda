//! Page layout calculations for the label overlay

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from points (1/72 inch)
    pub fn from_pt(pt: f64) -> Self {
        Length(pt * 25.4 / 72.0)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// A1 size (594mm × 841mm), large enough to cover any label format
    pub fn a1() -> Self {
        Self {
            width: Length::from_mm(594.0),
            height: Length::from_mm(841.0),
        }
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }

    /// A6 size (105mm × 148mm), the usual shipping label format
    pub fn a6() -> Self {
        Self {
            width: Length::from_mm(105.0),
            height: Length::from_mm(148.0),
        }
    }

    /// Parse a format name such as `A1` or `a4`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a1" => Some(Self::a1()),
            "a4" => Some(Self::a4()),
            "a6" => Some(Self::a6()),
            _ => None,
        }
    }

    /// Bounding box `[0 0 w h]` in points, rounded outward
    pub fn bbox_pt(&self) -> [i64; 4] {
        [0, 0, self.width.pt().ceil() as i64, self.height.pt().ceil() as i64]
    }
}

/// Baseline origins for a block of `line_count` lines whose first baseline sits
/// at `(x, y)`; subsequent lines move down by `leading`.
///
/// The coordinate system has origin at bottom-left of the page.
pub fn text_block_origins(x: f32, y: f32, leading: f32, line_count: usize) -> Vec<(f32, f32)> {
    (0..line_count)
        .map(|i| (x, y - i as f32 * leading))
        .collect()
}
