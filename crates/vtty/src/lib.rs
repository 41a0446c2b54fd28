//! vtty: render command output the way a fixed-size terminal would show it

pub mod capture;
pub mod cli;
