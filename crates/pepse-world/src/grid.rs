/// Largest multiple of `step` that is `<= x`. At the bottom of the `i32` range,
/// where that multiple is not representable, the lowest representable multiple.
#[inline]
pub fn snap_down(x: i32, step: i32) -> i32 {
    let s = step as i64;
    let down = snap_down_wide(x as i64, s);
    (if down < i32::MIN as i64 { down + s } else { down }) as i32
}

/// Smallest multiple of `step` that is `>= x`. At the top of the `i32` range,
/// where that multiple is not representable, the highest representable multiple.
#[inline]
pub fn snap_up(x: i32, step: i32) -> i32 {
    let s = step as i64;
    let up = snap_up_wide(x as i64, s);
    (if up > i32::MAX as i64 { up - s } else { up }) as i32
}

#[inline]
fn snap_down_wide(x: i64, step: i64) -> i64 {
    x.div_euclid(step) * step
}

#[inline]
fn snap_up_wide(x: i64, step: i64) -> i64 {
    let down = snap_down_wide(x, step);
    if down == x { x } else { down + step }
}

/// Grid-aligned x coordinates inside a range, ascending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridRange {
    next: i64,
    end: i64,
    step: i64,
}

impl GridRange {
    /// Aligned points in `[min, max)`.
    pub fn half_open(min: i32, max: i32, step: i32) -> Self {
        debug_assert!(step > 0);
        Self {
            next: snap_up_wide(min as i64, step as i64),
            end: max as i64,
            step: step as i64,
        }
    }

    /// Aligned points in `[min, max]`.
    pub fn closed(min: i32, max: i32, step: i32) -> Self {
        debug_assert!(step > 0);
        Self {
            next: snap_up_wide(min as i64, step as i64),
            end: max as i64 + 1,
            step: step as i64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.next >= self.end
    }
}

impl Iterator for GridRange {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.next >= self.end {
            return None;
        }
        let x = self.next as i32;
        self.next += self.step;
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.next >= self.end {
            0
        } else {
            ((self.end - self.next + self.step - 1) / self.step) as usize
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for GridRange {}
