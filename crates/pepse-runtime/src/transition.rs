use pepse_geom::Vec2;

/// Object property driven by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Angle,
    Opacity,
    Dimensions,
    Velocity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    Vector(Vec2),
}

impl TweenValue {
    fn lerp(self, to: TweenValue, t: f32) -> TweenValue {
        match (self, to) {
            (TweenValue::Scalar(a), TweenValue::Scalar(b)) => TweenValue::Scalar(a + (b - a) * t),
            (TweenValue::Vector(a), TweenValue::Vector(b)) => TweenValue::Vector(a.lerp(b, t)),
            // Mismatched endpoints snap at the midpoint.
            (a, b) => {
                if t < 0.5 {
                    a
                } else {
                    b
                }
            }
        }
    }

    pub fn as_scalar(self) -> f32 {
        match self {
            TweenValue::Scalar(v) => v,
            TweenValue::Vector(v) => v.x,
        }
    }

    pub fn as_vector(self) -> Vec2 {
        match self {
            TweenValue::Scalar(v) => Vec2::splat(v),
            TweenValue::Vector(v) => v,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionMode {
    /// Runs once, holds the end value, then fires its completion task.
    Once,
    /// Restarts from `from` after reaching `to`.
    Loop,
    /// Ping-pongs between `from` and `to` forever.
    BackAndForth,
}

/// Handle of a transition within its owning object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionId(pub(crate) u32);

/// Linear interpolation of one object channel over time.
#[derive(Clone, Debug)]
pub struct Transition<T> {
    pub(crate) id: TransitionId,
    channel: Channel,
    from: TweenValue,
    to: TweenValue,
    duration: f32,
    mode: TransitionMode,
    elapsed: f32,
    forward: bool,
    finished: bool,
    on_complete: Option<T>,
}

impl<T> Transition<T> {
    pub fn new(channel: Channel, from: TweenValue, to: TweenValue, duration: f32, mode: TransitionMode) -> Self {
        Self {
            id: TransitionId(0),
            channel,
            from,
            to,
            duration: duration.max(f32::EPSILON),
            mode,
            elapsed: 0.0,
            forward: true,
            finished: false,
            on_complete: None,
        }
    }

    /// Task handed to the scheduler when a `Once` transition reaches its end.
    pub fn on_complete(mut self, task: T) -> Self {
        self.on_complete = Some(task);
        self
    }

    #[inline]
    pub fn id(&self) -> TransitionId {
        self.id
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[inline]
    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn value(&self) -> TweenValue {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        let t = if self.forward { t } else { 1.0 - t };
        self.from.lerp(self.to, t)
    }

    /// Advances by `dt` seconds. Returns the completion task on the tick a
    /// `Once` transition finishes.
    pub(crate) fn advance(&mut self, dt: f32) -> Option<T> {
        if self.finished {
            return None;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.duration {
            return None;
        }
        match self.mode {
            TransitionMode::Once => {
                self.elapsed = self.duration;
                self.finished = true;
                self.on_complete.take()
            }
            TransitionMode::Loop => {
                self.elapsed %= self.duration;
                None
            }
            TransitionMode::BackAndForth => {
                let laps = (self.elapsed / self.duration) as u32;
                self.elapsed -= laps as f32 * self.duration;
                if laps % 2 == 1 {
                    self.forward = !self.forward;
                }
                None
            }
        }
    }
}
