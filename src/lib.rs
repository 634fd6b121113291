//! JobTrack
//!
//! Composition root: configuration, tracing, dependency wiring and the
//! command-line surface over the bookmark store.
//!
//! 组合根：配置、日志、依赖装配与命令行入口。

pub mod bootstrap;
pub mod cli;
