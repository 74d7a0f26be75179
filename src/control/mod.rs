//! Fan duty control: the discrete, hysteretic band table.

pub mod bands;
