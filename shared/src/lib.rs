pub mod models;
pub mod utils;

// Boundary types shared between the prediction engine and whatever renders its output.
// Everything here is plain data: no randomness, no I/O.
