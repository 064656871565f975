//! Movement behaviours for mobile entities.
//!
//! Behaviour is chosen per mover type when the scene is built and never
//! swapped afterwards. [`Motion`] is the closed set of behaviours a mover can
//! carry; each variant implements [`Movement`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Largest heading perturbation applied by [`Steering`], in degrees.
pub const MAX_TURN_DEGREES: f64 = 90.0;

/// Largest per-axis velocity drawn by [`Wander`] when none is configured.
pub const DEFAULT_WANDER_STEP: f64 = 5.0;

/// One tick of movement.
pub trait Movement {
    /// Move `rect` one tick, aiming at `goal` where the behaviour cares.
    /// Returns the displacement applied.
    fn advance<R: Rng>(&mut self, rect: &mut Rect, goal: Point, rng: &mut R) -> Point;

    /// Displacement applied on the last tick.
    fn velocity(&self) -> Point;
}

/// Random walk: apply the current velocity, then draw a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Wander {
    max_step: f64,
    velocity: Point,
}

impl Wander {
    /// A walker whose per-axis velocity is drawn from `[-max_step, max_step]`.
    pub fn new(max_step: f64) -> Self {
        Self {
            max_step: max_step.abs(),
            velocity: Point::default(),
        }
    }
}

impl Default for Wander {
    fn default() -> Self {
        Self::new(DEFAULT_WANDER_STEP)
    }
}

impl Movement for Wander {
    fn advance<R: Rng>(&mut self, rect: &mut Rect, _goal: Point, rng: &mut R) -> Point {
        let applied = self.velocity;
        rect.translate(applied);
        if self.max_step > 0.0 {
            self.velocity = Point::new(
                rng.random_range(-self.max_step..=self.max_step),
                rng.random_range(-self.max_step..=self.max_step),
            );
        }
        applied
    }

    fn velocity(&self) -> Point {
        self.velocity
    }
}

/// Goal seeking with a random heading perturbation.
///
/// Each tick the heading toward the goal is rotated by an angle drawn from
/// `[-90°, 90°]` and scaled to `speed`. Paths vary and may wander away from
/// the goal for a while.
#[derive(Debug, Clone, PartialEq)]
pub struct Steering {
    speed: f64,
    velocity: Point,
}

impl Steering {
    /// A steerer covering `speed` units per tick.
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            velocity: Point::default(),
        }
    }
}

impl Movement for Steering {
    fn advance<R: Rng>(&mut self, rect: &mut Rect, goal: Point, rng: &mut R) -> Point {
        let from = rect.center();
        let heading = Point::new(goal.x - from.x, goal.y - from.y);
        let distance = heading.length();
        if distance <= f64::EPSILON {
            self.velocity = Point::default();
            return self.velocity;
        }

        let turn = rng.random_range(-MAX_TURN_DEGREES..=MAX_TURN_DEGREES);
        self.velocity = heading
            .scaled(1.0 / distance)
            .rotated(turn)
            .scaled(self.speed);
        rect.translate(self.velocity);
        self.velocity
    }

    fn velocity(&self) -> Point {
        self.velocity
    }
}

/// Name of a movement behaviour, as written in mover definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    /// [`Steering`].
    #[default]
    Steer,
    /// [`Wander`].
    Wander,
}

/// The behaviour a mover carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Goal seeking.
    Steering(Steering),
    /// Goal-blind random walk.
    Wander(Wander),
}

impl Motion {
    /// Build the behaviour named by `kind`. `speed` is the steering speed or
    /// the wander step bound.
    pub fn new(kind: MotionKind, speed: f64) -> Self {
        match kind {
            MotionKind::Steer => Self::Steering(Steering::new(speed)),
            MotionKind::Wander => Self::Wander(Wander::new(speed)),
        }
    }

    /// Which behaviour this is.
    pub fn kind(&self) -> MotionKind {
        match self {
            Self::Steering(_) => MotionKind::Steer,
            Self::Wander(_) => MotionKind::Wander,
        }
    }
}

impl Movement for Motion {
    fn advance<R: Rng>(&mut self, rect: &mut Rect, goal: Point, rng: &mut R) -> Point {
        match self {
            Self::Steering(steering) => steering.advance(rect, goal, rng),
            Self::Wander(wander) => wander.advance(rect, goal, rng),
        }
    }

    fn velocity(&self) -> Point {
        match self {
            Self::Steering(steering) => steering.velocity(),
            Self::Wander(wander) => wander.velocity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn steering_moves_exactly_speed() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut steering = Steering::new(4.0);
        for _ in 0..50 {
            let step = steering.advance(&mut rect, Point::new(500.0, 500.0), &mut rng);
            assert!((step.length() - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn steering_never_points_backwards() {
        let mut rng = StdRng::seed_from_u64(5);
        let goal = Point::new(1000.0, 5.0);
        for _ in 0..200 {
            let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
            let step = Steering::new(1.0).advance(&mut rect, goal, &mut rng);
            // Rotation is bounded by a quarter turn, so the x component never
            // opposes a goal straight to the right.
            assert!(step.x >= -1e-9, "step {step:?}");
        }
    }

    #[test]
    fn steering_at_goal_stays_put() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let step = Steering::new(3.0).advance(&mut rect, Point::new(5.0, 5.0), &mut rng);
        assert_eq!(step, Point::default());
        assert_eq!(rect.origin(), Point::default());
    }

    #[test]
    fn wander_applies_previous_velocity() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut wander = Wander::default();

        let first = wander.advance(&mut rect, Point::default(), &mut rng);
        assert_eq!(first, Point::default());
        let drawn = wander.velocity();
        assert!(drawn.x.abs() <= DEFAULT_WANDER_STEP && drawn.y.abs() <= DEFAULT_WANDER_STEP);

        let second = wander.advance(&mut rect, Point::default(), &mut rng);
        assert_eq!(second, drawn);
        assert_eq!(rect.origin(), drawn);
    }

    #[test]
    fn motion_kind_round_trip() {
        assert_eq!(Motion::new(MotionKind::Wander, 2.0).kind(), MotionKind::Wander);
        assert_eq!(Motion::new(MotionKind::Steer, 2.0).kind(), MotionKind::Steer);
    }
}
