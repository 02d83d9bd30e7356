//! Interactive workflows driven by a front-end.

pub mod capture;

pub use self::capture::Capture;
