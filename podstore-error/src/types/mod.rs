pub mod pod_error;

pub use pod_error::*;
