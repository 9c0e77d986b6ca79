pub mod error;
pub mod model;
pub mod integrate;
pub mod solver;
pub mod sweep;
pub mod config;

pub mod canvas;
pub mod array;
pub mod pen;
pub mod plot;
pub mod colormap;
pub mod render;

pub use canvas::Canvas;
pub use error::{DuffingError, Result};
pub use model::DuffingParams;
pub use solver::{solve, solve_duffing, SolveParams, Solution};
