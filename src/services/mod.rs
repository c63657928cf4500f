//! Workflows that span more than one actor.
//!
//! A single actor message is atomic; anything that touches two actors is not. These
//! services order the steps so the first mutation is the one that can fail on a business
//! rule, and compensate explicitly when a later step fails.

mod checkout;
mod transfer;

pub use checkout::*;
pub use transfer::*;
