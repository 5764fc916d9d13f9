//! Small pure helpers shared by services and controllers.

pub mod geo;
pub mod parse;
