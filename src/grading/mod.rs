//! Grade aggregation pipeline.
//!
//! This module resolves letter grades to point values, groups a student's
//! grade records by semester, computes credit-weighted GPAs, and assembles
//! the transcript exported as JSON.

pub mod aggregate;
pub mod points;
pub mod types;
