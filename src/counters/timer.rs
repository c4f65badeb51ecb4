use std::{
    fmt::{Display, Error, Formatter},
    time::Duration,
};

/// A timer.
///
/// Timing is only recorded when the `profiler` feature is enabled.
#[derive(Copy, Clone, Debug, Default)]
pub struct Timer {
    time: Duration,
    #[cfg(feature = "profiler")]
    start: Option<web_time::Instant>,
}

impl Timer {
    /// Creates a new timer initialized to zero and not started.
    pub fn new() -> Self {
        Timer {
            time: Duration::from_secs(0),
            #[cfg(feature = "profiler")]
            start: None,
        }
    }

    /// Resets the timer to 0.
    pub fn reset(&mut self) {
        self.time = Duration::from_secs(0)
    }

    /// Start the timer.
    pub fn start(&mut self) {
        #[cfg(feature = "profiler")]
        {
            self.time = Duration::from_secs(0);
            self.start = Some(web_time::Instant::now());
        }
    }

    /// Pause the timer.
    pub fn pause(&mut self) {
        #[cfg(feature = "profiler")]
        {
            if let Some(start) = self.start {
                self.time += web_time::Instant::now().duration_since(start);
            }
            self.start = None;
        }
    }

    /// The measured time between the last `.start()` and `.pause()` calls, in milliseconds.
    pub fn time(&self) -> f64 {
        self.time.as_secs_f64() * 1000.0
    }
}

impl Display for Timer {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}s", self.time.as_secs_f32())
    }
}
