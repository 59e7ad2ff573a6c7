#![allow(dead_code)]

pub use ecsrun_test_utils::builders;
pub use ecsrun_test_utils::{init_tracing, with_time_limit, with_timeout};

pub const CLUSTER: &str = "prod";
pub const SERVICE: &str = "web";
