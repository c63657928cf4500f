//! Explicit session objects.
//!
//! A session holds who is signed in plus their in-progress state (cart, applied
//! discount). Sessions are created from a running
//! [`Storefront`](crate::lifecycle::Storefront), hold cloned clients, and end with
//! `logout`; nothing about the signed-in user is global.

mod admin;
mod shop;

pub use admin::*;
pub use shop::*;
