// 🎞️ Progressive reveal
//
// A reveal owns a frame function that captures its own target values and
// maps a progress fraction in [0, 1] to the value to draw. The host calls
// `advance` once per frame until `is_settled`. Replacing a reveal is how an
// animation restarts: the old frame function (and its targets) is dropped,
// so nothing from a superseded render can be drawn again.

/// Frames per animation.
pub const REVEAL_STEPS: u32 = 20;

pub struct Reveal<T> {
    steps: u32,
    progress: u32,
    frame: Box<dyn Fn(f64) -> T>,
}

impl<T> Reveal<T> {
    pub fn new(steps: u32, frame: impl Fn(f64) -> T + 'static) -> Self {
        Reveal {
            steps,
            progress: 0,
            frame: Box::new(frame),
        }
    }

    /// Fraction of the way to the target. Exactly 1.0 once settled.
    pub fn fraction(&self) -> f64 {
        if self.steps == 0 || self.progress >= self.steps {
            1.0
        } else {
            f64::from(self.progress) / f64::from(self.steps)
        }
    }

    pub fn is_settled(&self) -> bool {
        self.progress >= self.steps
    }

    /// Moves one step forward (never past the end) and returns the new frame.
    pub fn advance(&mut self) -> T {
        if !self.is_settled() {
            self.progress += 1;
        }
        self.current()
    }

    pub fn current(&self) -> T {
        (self.frame)(self.fraction())
    }

    /// Skips to the final frame.
    pub fn settle(&mut self) -> T {
        self.progress = self.steps;
        self.current()
    }

    /// Final value, regardless of progress.
    pub fn target(&self) -> T {
        (self.frame)(1.0)
    }
}

impl<T> std::fmt::Debug for Reveal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reveal")
            .field("steps", &self.steps)
            .field("progress", &self.progress)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaled_values(targets: Vec<f64>, steps: u32) -> Reveal<Vec<f64>> {
        Reveal::new(steps, move |fraction| {
            targets.iter().map(|target| target * fraction).collect()
        })
    }

    #[test]
    fn test_starts_at_zero_and_settles_on_target() {
        let targets = vec![0.1, 37.3, 1e9 / 3.0];
        let mut reveal = scaled_values(targets.clone(), REVEAL_STEPS);

        assert_eq!(reveal.current(), vec![0.0, 0.0, 0.0]);

        let mut frames = 0;
        while !reveal.is_settled() {
            reveal.advance();
            frames += 1;
        }

        assert_eq!(frames, REVEAL_STEPS);
        // Exact equality, not approximate: the settled frame is the target
        assert_eq!(reveal.current(), targets);
    }

    #[test]
    fn test_frames_are_monotonic() {
        let mut reveal = scaled_values(vec![50.0], 10);
        let mut last = reveal.current()[0];

        for _ in 0..10 {
            let next = reveal.advance()[0];
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn test_advance_past_end_is_stable() {
        let mut reveal = scaled_values(vec![12.5], 3);
        reveal.settle();

        assert_eq!(reveal.advance(), vec![12.5]);
        assert_eq!(reveal.advance(), vec![12.5]);
    }

    #[test]
    fn test_replacing_restarts_with_captured_targets() {
        let mut targets = vec![10.0];
        let mut reveal = scaled_values(targets.clone(), 4);
        reveal.advance();
        reveal.advance();

        // New data arrives mid-animation: a fresh reveal starts from zero
        targets[0] = 99.0;
        reveal = scaled_values(targets.clone(), 4);

        assert_eq!(reveal.fraction(), 0.0);
        assert_eq!(reveal.target(), vec![99.0]);
    }

    #[test]
    fn test_zero_steps_is_settled() {
        let reveal = Reveal::new(0, |fraction| fraction * 2.0);
        assert!(reveal.is_settled());
        assert_eq!(reveal.current(), 2.0);
    }
}
