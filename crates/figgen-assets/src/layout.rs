//! Grid geometry and aspect-ratio presets
//!
//! [`grid_layout`] is deterministic and pure in the icon count; composition
//! and slicing both derive their geometry from it and therefore always agree.

/// A rows-by-columns sprite-sheet grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl GridLayout {
    /// Total cells, including trailing empty ones
    #[inline]
    #[must_use]
    pub fn slots(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major cell coordinates of slot `index`
    #[inline]
    #[must_use]
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Width-over-height ratio of the grid
    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.cols as f64 / self.rows as f64
    }
}

/// Near-square grid for `count` icons
///
/// Columns are `ceil(sqrt(count))`, rows `ceil(count / cols)`. Counts 8 and
/// 12 are special-cased to 2x4 and 3x4 for visual balance.
#[must_use]
pub fn grid_layout(count: usize) -> GridLayout {
    match count {
        8 => GridLayout { rows: 2, cols: 4 },
        12 => GridLayout { rows: 3, cols: 4 },
        _ => {
            let cols = (count as f64).sqrt().ceil() as usize;
            let cols = cols.max(1);
            let rows = count.div_ceil(cols).max(1);
            GridLayout { rows, cols }
        }
    }
}

/// The five aspect-ratio presets the image service supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// 1:1
    Square,
    /// 4:3
    FourThree,
    /// 3:4
    ThreeFour,
    /// 16:9
    SixteenNine,
    /// 9:16
    NineSixteen,
}

impl AspectRatio {
    /// All presets; declaration order is the tie-break preference order
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::FourThree,
        AspectRatio::ThreeFour,
        AspectRatio::SixteenNine,
        AspectRatio::NineSixteen,
    ];

    /// Numeric width-over-height value of the preset
    #[inline]
    #[must_use]
    pub fn ratio(&self) -> f64 {
        match self {
            Self::Square => 1.0,
            Self::FourThree => 1.333,
            Self::ThreeFour => 0.75,
            Self::SixteenNine => 1.778,
            Self::NineSixteen => 0.562,
        }
    }

    /// Service-facing preset string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::FourThree => "4:3",
            Self::ThreeFour => "3:4",
            Self::SixteenNine => "16:9",
            Self::NineSixteen => "9:16",
        }
    }

    /// Closest preset to `target` by absolute ratio difference
    ///
    /// Equal distances resolve to the earliest entry in [`Self::ALL`].
    #[must_use]
    pub fn nearest(target: f64) -> AspectRatio {
        let mut best = Self::ALL[0];
        let mut best_diff = (target - best.ratio()).abs();
        for preset in &Self::ALL[1..] {
            let diff = (target - preset.ratio()).abs();
            if diff < best_diff {
                best = *preset;
                best_diff = diff;
            }
        }
        best
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
