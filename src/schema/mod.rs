//! Wire schema for landmark frames
//!
//! This module defines the `mudra.frame.v1` input record produced by the
//! perception side and the adapter that turns it into pipeline input.

mod adapter;
mod frame;

pub use adapter::*;
pub use frame::*;
