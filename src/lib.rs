//! Aerosat - airline passenger satisfaction prediction
//!
//! Trains a gradient-boosted tree model on passenger survey data and serves
//! predictions through a small web app and an offline batch command.

pub mod bundle;
pub mod classifier;
pub mod cli;
pub mod dataset;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod train;
