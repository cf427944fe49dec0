/// One range operation for the terrain and tree streamers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamOp {
    /// Half-open `[min, max)`.
    Create { min: i32, max: i32 },
    /// Closed `[min, max]`.
    Delete { min: i32, max: i32 },
}

/// Sliding window that follows the avatar.
///
/// With half-width `H` and buffer `B`, the anchor `p` keeps `[p - H, p + H]`
/// materialized and nothing outside `[p - H - 2B, p + H + B]`. Every returned
/// batch lists its creates before its deletes. Bounds are computed in `i64` and
/// clamped to `i32`, so anchors anywhere in the `i32` range are valid.
///
/// The grid column holding the left viewport edge starts up to one block left
/// of `p - H`; a buffer of at least one block keeps it inside the window.
#[derive(Clone, Debug)]
pub struct StreamWindow {
    half_width: i32,
    buffer: i32,
    anchor: Option<i32>,
}

#[inline]
fn clamp(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl StreamWindow {
    pub fn new(half_width: i32, buffer: i32) -> Self {
        Self {
            half_width,
            buffer,
            anchor: None,
        }
    }

    /// Initial fill around `x`; discards any previous anchor.
    pub fn prime(&mut self, x: i32) -> Vec<StreamOp> {
        let (x, h, b) = (x as i64, self.half_width as i64, self.buffer as i64);
        self.anchor = Some(x as i32);
        vec![StreamOp::Create { min: clamp(x - h - b), max: clamp(x + h + b) }]
    }

    /// Ranges exposed and retired by moving the anchor to `x`. Works for any
    /// displacement, so a teleport is a single call.
    pub fn advance(&mut self, x: i32) -> Vec<StreamOp> {
        let Some(p0) = self.anchor else {
            return self.prime(x);
        };
        let (p0, p1) = (p0 as i64, x as i64);
        let (h, b) = (self.half_width as i64, self.buffer as i64);
        let ops = if p1 > p0 {
            // starts past the trailing delete so the left edge column survives a jump
            vec![
                StreamOp::Create { min: clamp((p0 + h).max(p1 - h - b + 1)), max: clamp(p1 + h + b) },
                StreamOp::Delete { min: clamp(p0 - h - 2 * b), max: clamp(p1 - h - b) },
            ]
        } else if p1 < p0 {
            vec![
                StreamOp::Create { min: clamp(p1 - h - b), max: clamp((p0 - h).min(p1 + h + 1)) },
                StreamOp::Delete { min: clamp(p1 + h + b), max: clamp(p0 + h + 2 * b) },
            ]
        } else {
            Vec::new()
        };
        self.anchor = Some(x);
        ops
    }

    #[inline]
    pub fn anchor(&self) -> Option<i32> {
        self.anchor
    }

    #[inline]
    pub fn half_width(&self) -> i32 {
        self.half_width
    }

    #[inline]
    pub fn buffer(&self) -> i32 {
        self.buffer
    }
}
