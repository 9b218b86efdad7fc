//! Equivalent-static load generators: wind (basic speed-pressure method) and
//! seismic (equivalent static base shear). Both produce nodal force
//! distributions the caller folds into a load case; neither mutates a
//! `Model` directly.

pub mod seismic;
pub mod wind;
