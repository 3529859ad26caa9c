//! Command line front end for reading an MB4052 on a Raspberry Pi.

pub mod cli;
