//! Counters for benchmarking the constraint solver.

use std::fmt::{Display, Formatter, Result};

pub use self::solver_counters::SolverCounters;
pub use self::timer::Timer;

mod solver_counters;
mod timer;

/// Aggregation of all the performances counters tracked by the solver.
#[derive(Clone, Copy, Debug)]
pub struct Counters {
    /// Whether this counter is enabled or not.
    pub enabled: bool,
    /// Timer for a whole timestep.
    pub step_time: Timer,
    /// Counters of the constraints resolution stage.
    pub solver: SolverCounters,
}

impl Counters {
    /// Create a new set of counters initialized to zero.
    pub fn new(enabled: bool) -> Self {
        Counters {
            enabled,
            step_time: Timer::new(),
            solver: SolverCounters::new(),
        }
    }

    /// Enable all the counters.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Return `true` if the counters are enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disable all the counters.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Notify that the time-step has started.
    pub fn step_started(&mut self) {
        if self.enabled {
            self.step_time.start();
        }
    }

    /// Notify that the time-step has finished.
    pub fn step_completed(&mut self) {
        if self.enabled {
            self.step_time.pause();
        }
    }

    /// Total time spent for one step of the solver, in milliseconds.
    pub fn step_time(&self) -> f64 {
        self.step_time.time()
    }

    /// Set the number of constraints submitted to the solver.
    pub fn set_nconstraints(&mut self, n: usize) {
        self.solver.nconstraints = n;
    }

    /// Set the number of bodies whose velocities are corrected.
    pub fn set_nbodies(&mut self, n: usize) {
        self.solver.nbodies = n;
    }

    /// Set the number of Gauss-Seidel sweeps performed.
    pub fn set_niterations(&mut self, n: usize) {
        self.solver.niterations = n;
    }

    /// Resets all the counters and timers, even when disabled.
    pub fn reset(&mut self) {
        self.step_time.reset();
        self.solver.reset();
    }
}

macro_rules! measure_method {
    ($started:ident, $stopped:ident, $time:ident, $info:ident. $timer:ident) => {
        impl Counters {
            /// Start this timer.
            pub fn $started(&mut self) {
                if self.enabled {
                    self.$info.$timer.start()
                }
            }

            /// Stop this timer.
            pub fn $stopped(&mut self) {
                if self.enabled {
                    self.$info.$timer.pause()
                }
            }

            /// Gets the time elapsed for this timer.
            pub fn $time(&self) -> f64 {
                if self.enabled {
                    self.$info.$timer.time()
                } else {
                    0.0
                }
            }
        }
    };
}

measure_method!(
    assembly_started,
    assembly_completed,
    assembly_time,
    solver.velocity_assembly_time
);
measure_method!(
    velocity_resolution_started,
    velocity_resolution_completed,
    velocity_resolution_time,
    solver.velocity_resolution_time
);

impl Display for Counters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Total timestep time: {}", self.step_time)?;
        self.solver.fmt(f)
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new(false)
    }
}
