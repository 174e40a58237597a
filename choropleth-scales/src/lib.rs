pub mod classed_color;
pub mod classify;
pub mod error;
pub mod ramp;
