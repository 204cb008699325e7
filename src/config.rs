/// What happens to sprite pixels that fall outside the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Pixels past the right or bottom edge are dropped.
    #[default]
    Clip,
    /// Pixels past an edge reappear on the opposite side.
    Wrap,
}

/// Interpreter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// sprite edge policy for DXYN
    pub edges: EdgeMode,

    /// When set, 00EE resumes at the instruction following the call instead
    /// of the call instruction itself.
    pub resume_after_call: bool,

    /// seed for CXNN; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl EdgeMode {
    /// Map a (possibly out of range) pixel coordinate to its display offset.
    pub fn locate(self, x: usize, y: usize, width: usize, height: usize) -> Option<usize> {
        match self {
            EdgeMode::Clip if x < width && y < height => Some(x + y * width),
            EdgeMode::Clip => None,
            EdgeMode::Wrap => Some((x % width) + (y % height) * width),
        }
    }
}
