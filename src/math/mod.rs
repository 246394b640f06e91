//! Mathematical utilities

pub mod spline;

pub use spline::Spline;
