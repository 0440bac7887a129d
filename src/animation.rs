//! Scripted per-object animation state.
//!
//! The demo scene animates objects with simple counters rather than a physics
//! or timeline system. Each animated object owns its counters explicitly so
//! there is no process wide mutable state shared between objects.

/// A value that oscillates between `min` and `max` by a fixed step, reversing
/// direction whenever it reaches either bound.
#[derive(Clone, Copy, Debug)]
pub struct PingPong {
    value: f32,
    min: f32,
    max: f32,
    step: f32,
    rising: bool,
}

impl PingPong {
    /// Create a new oscillator starting at `start` and initially rising.
    ///
    /// `start` must lie inside `[min, max]` and the step must be positive.
    pub fn new(start: f32, min: f32, max: f32, step: f32) -> Self {
        assert!(min < max);
        assert!(step > 0.0);
        assert!((min..=max).contains(&start));

        Self {
            value: start,
            min,
            max,
            step,
            rising: true,
        }
    }

    /// Advance the oscillator by one frame and return the new value.
    ///
    /// The direction is flipped before stepping so a value resting on a bound
    /// immediately moves back into the interval.
    pub fn advance(&mut self) -> f32 {
        if self.value >= self.max || self.value <= self.min {
            self.rising = !self.rising;
        }

        let step = if self.rising { self.step } else { -self.step };
        self.value = (self.value + step).clamp(self.min, self.max);
        self.value
    }

    /// The current value. Always within `[min, max]`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// True if the oscillator is currently moving toward `max`.
    pub fn rising(&self) -> bool {
        self.rising
    }
}

/// An angle in degrees that grows by a fixed increment each frame and wraps
/// back once it reaches a full turn.
#[derive(Clone, Copy, Debug)]
pub struct SpinAngle {
    degrees: f32,
    increment: f32,
}

impl SpinAngle {
    pub fn new(increment: f32) -> Self {
        assert!(increment > 0.0);
        Self {
            degrees: 0.0,
            increment,
        }
    }

    /// Advance the angle by one frame and return the new value in degrees.
    pub fn advance(&mut self) -> f32 {
        self.degrees += self.increment;
        if self.degrees >= 360.0 {
            self.degrees -= 360.0;
        }
        self.degrees
    }

    /// The current angle in degrees.
    pub fn degrees(&self) -> f32 {
        self.degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong_flips_exactly_once_per_boundary_crossing() {
        let mut p = PingPong::new(0.0, -3.0, 3.0, 0.01);
        let mut flips = 0;
        let mut was_rising = p.rising();

        // Two full periods worth of frames.
        for _ in 0..2400 {
            p.advance();
            if p.rising() != was_rising {
                flips += 1;
                was_rising = p.rising();
            }
        }

        // 0 -> 3 takes 300 frames, each further bound is 600 frames apart:
        // flips at 300, 900, 1500, 2100.
        assert_eq!(flips, 4);
    }

    #[test]
    fn ping_pong_direction_reverses_at_upper_bound() {
        let mut p = PingPong::new(0.0, -3.0, 3.0, 0.01);

        // Rises the whole way to the upper bound.
        while p.value() < 3.0 {
            assert!(p.rising());
            p.advance();
        }

        // The advance after touching the bound flips and moves back down.
        p.advance();
        assert!(!p.rising());
        assert!(p.value() < 3.0);
    }

    #[test]
    fn ping_pong_stays_within_bounds() {
        let mut p = PingPong::new(0.4, 0.1, 0.8, 0.001);

        for _ in 0..10_000 {
            let v = p.advance();
            assert!((0.1..=0.8).contains(&v), "value {v} escaped bounds");
        }
    }

    #[test]
    fn spin_angle_wraps_at_full_turn() {
        let mut a = SpinAngle::new(1.0);

        for _ in 0..359 {
            a.advance();
        }
        assert_eq!(a.degrees(), 359.0);

        // 359 + 1 reaches 360 and wraps back to zero.
        assert_eq!(a.advance(), 0.0);
        assert_eq!(a.advance(), 1.0);
    }

    #[test]
    fn spin_angle_never_reaches_full_turn() {
        let mut a = SpinAngle::new(1.0);

        for _ in 0..3600 {
            assert!(a.advance() < 360.0);
        }
    }
}
