pub mod analysis;
pub mod common;
pub mod domain;
pub mod fields;
pub mod integrator;
pub mod numerics;
pub mod table;
