//! # nimbus-realtime
//!
//! In-process realtime hub: tracks connected users and fans domain
//! events out to their event streams.

pub mod hub;

pub use hub::EventHub;
