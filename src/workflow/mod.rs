//! Training workflow: corpus files and the remote call sequence

pub mod corpus;
pub mod training;
