//! Marker types.

/// Marker type describing an arrival at work.
#[derive(Clone, Copy, Debug)]
pub struct CheckIn;

/// Marker type describing a departure from work.
#[derive(Clone, Copy, Debug)]
pub struct CheckOut;
