//! Shared parsing utilities.
//!
//! Line classification and timestamp normalisation for WhatsApp exports,
//! kept apart from [`crate::parser`] so the patterns can be tested on
//! their own.

pub mod whatsapp;

pub use whatsapp::{LineKind, classify_line, parse_whatsapp_timestamp};
