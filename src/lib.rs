//! Core library functions for the follow graph analyzer

pub mod analysis;
pub mod centrality;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod recommend;
pub mod storage;

pub use analysis::Analysis;
pub use config::Config;
pub use error::{AnalyzerError, Result};
