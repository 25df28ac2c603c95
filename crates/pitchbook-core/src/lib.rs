//! Core library for pitchbook, a football academy record keeper.
//!
//! Holds the domain models (players, evaluations, attendance,
//! subscriptions), the rating and attendance aggregations, record selection
//! and the view builders behind the comparison and progress charts. Storage
//! goes through the [`repository::Repository`] trait, backed either by the
//! built-in sample data or by the academy's hosted database with an offline
//! cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod repository;
pub mod select;
pub mod stats;
pub mod utils;
pub mod validate;
pub mod views;
