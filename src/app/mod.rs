pub mod pipelines;
pub mod tracking;
