pub mod routing;
pub mod solver;
