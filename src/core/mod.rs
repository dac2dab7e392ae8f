//! Service clients, configuration and data models

pub mod config;
pub mod errors;
pub mod management;
pub mod models;
pub mod translator;
