use crate::counters::Timer;
use std::fmt::{Display, Formatter, Result};

/// Performance counters related to constraints resolution.
#[derive(Default, Clone, Copy, Debug)]
pub struct SolverCounters {
    /// Number of constraints submitted to the solver.
    pub nconstraints: usize,
    /// Number of bodies receiving velocity corrections.
    pub nbodies: usize,
    /// Number of Gauss-Seidel sweeps performed.
    pub niterations: usize,
    /// Time spent for the precomputation of the effective masses and biases.
    pub velocity_assembly_time: Timer,
    /// Time spent for the resolution of the constraints (impulse computation).
    pub velocity_resolution_time: Timer,
}

impl SolverCounters {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        SolverCounters {
            nconstraints: 0,
            nbodies: 0,
            niterations: 0,
            velocity_assembly_time: Timer::new(),
            velocity_resolution_time: Timer::new(),
        }
    }

    /// Reset all the counters to zero.
    pub fn reset(&mut self) {
        self.nconstraints = 0;
        self.nbodies = 0;
        self.niterations = 0;
        self.velocity_assembly_time.reset();
        self.velocity_resolution_time.reset();
    }
}

impl Display for SolverCounters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Number of bodies: {}", self.nbodies)?;
        writeln!(f, "Number of constraints: {}", self.nconstraints)?;
        writeln!(f, "Number of iterations: {}", self.niterations)?;
        writeln!(f, "Velocity assembly time: {}", self.velocity_assembly_time)?;
        writeln!(
            f,
            "Velocity resolution time: {}",
            self.velocity_resolution_time
        )
    }
}
