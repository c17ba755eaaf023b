//! Voxgate - 文本转语音代理
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Synthesis Context: 合成文本、音色选择器、音频格式、SSML 构造
//!
//! 应用层 (application/):
//! - Ports: SpeechProviderPort（每种上游一个策略实现）
//! - Queries: SynthesizeHandler
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Azure Speech、Workers AI、Google Translate 客户端
//! - HTTP: GET /api/tts

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
