//! # ldi-processes
//!
//! One-factor stochastic processes and the scenario generator that turns
//! them into step × scenario tables: the reflecting square-root (CIR)
//! process for short rates and compounded geometric Brownian motion for
//! risky assets.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod geometric_brownian_motion;
pub mod scenario_generator;
pub mod square_root_process;
pub mod stochastic_process;

pub use geometric_brownian_motion::GeometricBrownianMotionProcess;
pub use scenario_generator::ScenarioGenerator;
pub use square_root_process::SquareRootProcess;
pub use stochastic_process::StochasticProcess1D;
