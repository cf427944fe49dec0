use log::trace;
use pepse_geom::Vec2;
use pepse_runtime::{Channel, GameObject, Transition, TransitionId, TransitionMode, TweenValue};
use pepse_world::WorldGenParams;
use pepse_world::hash::stream_seed;
use pepse_world::WorldSeed;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::event::Event;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafState {
    /// Resting on the canopy, not yet swaying.
    Dormant,
    /// Resting on the canopy and swaying.
    Animating,
    /// Dropping with a side-to-side swing while fading.
    Falling,
    /// Landed; fade-out still running.
    Fading,
    /// Fully transparent, waiting for the respawn timer.
    RespawnPending,
}

/// Durations and bounds of the leaf cycle, in seconds.
#[derive(Clone, Copy, Debug)]
pub struct LeafTiming {
    pub fade_out: f32,
    pub fall_velocity: f32,
    pub swing_period: f32,
    pub angle_amplitude: f32,
    pub angle_period: f32,
    pub size_shrink: f32,
    pub size_period: f32,
    pub max_fall_delay: u32,
    pub max_respawn_delay: u32,
}

impl LeafTiming {
    pub fn from_params(p: &WorldGenParams) -> Self {
        Self {
            fade_out: p.leaf_fade_out_time,
            fall_velocity: p.leaf_fall_velocity,
            swing_period: p.leaf_swing_period,
            angle_amplitude: p.leaf_angle_amplitude,
            angle_period: p.leaf_angle_period,
            size_shrink: p.leaf_size_shrink,
            size_period: p.leaf_size_period,
            max_fall_delay: p.leaf_max_fall_delay,
            max_respawn_delay: p.leaf_max_respawn_delay,
        }
    }
}

/// One leaf's cycle. The random stream is seeded from the rest position, so a
/// leaf recreated at the same spot draws the same delays in the same order.
pub struct Leaf {
    rest: Vec2,
    size: f32,
    state: LeafState,
    animated: bool,
    rng: ChaCha8Rng,
    swing: Option<TransitionId>,
    cycles: u32,
}

fn whole_seconds(rng: &mut ChaCha8Rng, max: u32) -> f32 {
    if max == 0 { 0.0 } else { rng.gen_range(0..max) as f32 }
}

impl Leaf {
    pub fn new(rest: Vec2, size: f32, seed: WorldSeed) -> Self {
        Self {
            rest,
            size,
            state: LeafState::Dormant,
            animated: false,
            rng: ChaCha8Rng::seed_from_u64(stream_seed(rest, seed)),
            swing: None,
            cycles: 0,
        }
    }

    /// Delays until the sway starts and until the first fall, drawn once at creation.
    pub fn initial_delays(&mut self, timing: &LeafTiming) -> (f32, f32) {
        let animate = self.rng.gen_range(0.0f32..1.0);
        let fall = whole_seconds(&mut self.rng, timing.max_fall_delay);
        (animate, fall)
    }

    pub fn animate(&mut self, obj: &mut GameObject<Event>, timing: &LeafTiming) {
        if self.animated {
            return;
        }
        self.animated = true;
        obj.add_transition(Transition::new(
            Channel::Angle,
            TweenValue::Scalar(-timing.angle_amplitude),
            TweenValue::Scalar(timing.angle_amplitude),
            timing.angle_period,
            TransitionMode::BackAndForth,
        ));
        obj.add_transition(Transition::new(
            Channel::Dimensions,
            TweenValue::Vector(Vec2::splat(self.size)),
            TweenValue::Vector(Vec2::splat(self.size - timing.size_shrink)),
            timing.size_period,
            TransitionMode::BackAndForth,
        ));
        if self.state == LeafState::Dormant {
            self.state = LeafState::Animating;
        }
    }

    /// Starts the fade-out and the swinging descent. Returns false if the leaf
    /// was not resting.
    pub fn fall(&mut self, obj: &mut GameObject<Event>, timing: &LeafTiming) -> bool {
        if !matches!(self.state, LeafState::Dormant | LeafState::Animating) {
            return false;
        }
        obj.add_transition(
            Transition::new(
                Channel::Opacity,
                TweenValue::Scalar(obj.opacity),
                TweenValue::Scalar(0.0),
                timing.fade_out,
                TransitionMode::Once,
            )
            .on_complete(Event::LeafFaded),
        );
        let v = timing.fall_velocity;
        self.swing = Some(obj.add_transition(Transition::new(
            Channel::Velocity,
            TweenValue::Vector(Vec2::new(-v, v)),
            TweenValue::Vector(Vec2::new(v, v)),
            timing.swing_period,
            TransitionMode::BackAndForth,
        )));
        self.state = LeafState::Falling;
        true
    }

    /// Ground contact. Only a descending leaf lands: it stops, loses its swing
    /// and becomes immovable while the fade keeps running.
    pub fn land(&mut self, obj: &mut GameObject<Event>) -> bool {
        if self.state != LeafState::Falling || obj.velocity.y <= 0.0 {
            return false;
        }
        self.stop(obj);
        obj.mass = 0.0;
        self.state = LeafState::Fading;
        true
    }

    /// Fade-out finished. Returns the delay before respawning.
    pub fn faded(&mut self, obj: &mut GameObject<Event>, timing: &LeafTiming) -> f32 {
        self.stop(obj);
        obj.opacity = 0.0;
        self.state = LeafState::RespawnPending;
        whole_seconds(&mut self.rng, timing.max_respawn_delay)
    }

    /// Back to the rest slot at full opacity. Returns the delay before the next fall.
    pub fn respawn(&mut self, obj: &mut GameObject<Event>, timing: &LeafTiming) -> f32 {
        obj.opacity = 1.0;
        obj.position = self.rest;
        obj.velocity = Vec2::ZERO;
        obj.mass = 1.0;
        self.state = if self.animated { LeafState::Animating } else { LeafState::Dormant };
        self.cycles += 1;
        trace!(target: "leaves", "leaf at {:?} respawned (cycle {})", self.rest, self.cycles);
        whole_seconds(&mut self.rng, timing.max_fall_delay)
    }

    fn stop(&mut self, obj: &mut GameObject<Event>) {
        if let Some(id) = self.swing.take() {
            obj.remove_transition(id);
        }
        obj.velocity = Vec2::ZERO;
    }

    #[inline]
    pub fn state(&self) -> LeafState {
        self.state
    }

    #[inline]
    pub fn rest(&self) -> Vec2 {
        self.rest
    }

    #[inline]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.animated
    }
}
