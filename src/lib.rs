//! Prayer-time countdowns, Quran reading goals and Azkar counters.
//!
//! The two pure pieces are [`prayer_times`] (which prayer is current, which
//! is next, and how long until it) and [`goals::tracker`] (bounded progress
//! with a one-time completion reward). [`db`] and [`goals::service`] persist
//! them in a local SQLite document store.

pub mod config;
pub mod db;
pub mod error;
pub mod goals;
pub mod models;
pub mod prayer_times;
pub mod utils;

pub use error::FaithError;
