//! SeaORM entity definitions.

pub mod employee;
pub mod jsa;
pub mod jsa_step;
pub mod location;
