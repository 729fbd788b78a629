//! Analysis of repeated-measures growth records.
//!
//! The central operation is [`healthy::weight_gain_when_healthy`], the mean
//! weight change of one subject over the time steps it was not sick.

pub mod config;
pub mod data;
pub mod error;
pub mod growth;
pub mod healthy;
pub mod manager;
pub mod model;
pub mod stats;
pub mod summary;
