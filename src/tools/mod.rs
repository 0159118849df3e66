//! Typed invocations of the external programs termshot drives.

pub mod capture;
pub mod input;
pub mod terminal;
pub mod window;
