//! Per-voice linear gain ramp, advanced once per service tick.
//!
//! Deliberately decoupled from the audio rate: the mixer only ever reads
//! the published current value, never advances it, keeping the interrupt
//! handler arithmetic-only.

/// Linear ramp generator for one voice's audible level.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GainRamp {
    current: f32,
    target: f32,
    step: f32,
    ticks_left: u16,
}

impl GainRamp {
    /// Start silent, aimed at `target`.
    pub fn new(target: f32) -> Self {
        Self { current: 0.0, target, step: 0.0, ticks_left: 0 }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// No glide in flight.
    pub fn is_settled(&self) -> bool {
        self.ticks_left == 0
    }

    /// Schedule a glide from the current value to `target` over `ticks`.
    /// Zero ticks snaps immediately.
    pub fn arm(&mut self, target: f32, ticks: u16) {
        self.target = target;
        if ticks == 0 {
            self.current = target;
            self.step = 0.0;
            self.ticks_left = 0;
        } else {
            self.step = (target - self.current) / ticks as f32;
            self.ticks_left = ticks;
        }
    }

    /// One service tick of ramp progress; returns the new current value.
    ///
    /// On the final tick the value snaps to the target exactly, so
    /// floating-point step error never accumulates. With no ramp in
    /// flight the current value tracks the target directly.
    pub fn advance(&mut self) -> f32 {
        if self.ticks_left > 0 {
            self.current += self.step;
            self.ticks_left -= 1;
            if self.ticks_left == 0 {
                self.current = self.target;
                self.step = 0.0;
            }
        } else {
            self.current = self.target;
        }
        self.current
    }

    /// Reset to silence aimed at `target`, clearing any glide.
    pub fn reset(&mut self, target: f32) {
        self.current = 0.0;
        self.target = target;
        self.step = 0.0;
        self.ticks_left = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_reaches_target_exactly() {
        let mut ramp = GainRamp::new(0.0);
        ramp.arm(0.9, 3);
        ramp.advance();
        ramp.advance();
        assert!(!ramp.is_settled());
        let last = ramp.advance();
        assert_eq!(last, 0.9);
        assert!(ramp.is_settled());
    }

    #[test]
    fn zero_ticks_snaps() {
        let mut ramp = GainRamp::new(0.0);
        ramp.arm(0.5, 0);
        assert_eq!(ramp.current(), 0.5);
        assert!(ramp.is_settled());
    }

    #[test]
    fn idle_tracks_target() {
        let mut ramp = GainRamp::new(0.7);
        assert_eq!(ramp.current(), 0.0);
        assert_eq!(ramp.advance(), 0.7);
    }

    #[test]
    fn downward_ramp() {
        let mut ramp = GainRamp::new(0.0);
        ramp.arm(0.8, 0);
        ramp.arm(0.0, 4);
        let mut prev = ramp.current();
        for _ in 0..4 {
            let v = ramp.advance();
            assert!(v <= prev);
            prev = v;
        }
        assert_eq!(ramp.current(), 0.0);
    }

    #[test]
    fn rearm_mid_ramp_glides_from_current() {
        let mut ramp = GainRamp::new(0.0);
        ramp.arm(1.0, 10);
        for _ in 0..5 {
            ramp.advance();
        }
        let mid = ramp.current();
        ramp.arm(0.0, 5);
        let first = ramp.advance();
        assert!(first < mid);
        for _ in 0..4 {
            ramp.advance();
        }
        assert_eq!(ramp.current(), 0.0);
    }
}
