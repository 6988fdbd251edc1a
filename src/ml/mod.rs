//! Numeric kernel: dataset handling, the regression model and its metrics.

pub mod artifact;
pub mod dataset;
pub mod elastic_net;
pub mod metrics;
pub mod split;

pub use artifact::ModelArtifact;
pub use dataset::Dataset;
pub use elastic_net::ElasticNet;
