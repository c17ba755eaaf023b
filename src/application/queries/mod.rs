//! 应用层 - 查询（读操作）
//!
//! 合成请求不修改任何状态，归入查询侧

mod synthesize_queries;

pub mod handlers;

pub use synthesize_queries::*;
