//! 服务注册表：声明式服务定义的加载、查询与热重载。
//!
//! # Service Registry
//!
//! A service document maps service names to [`ServiceDefinition`]s. The
//! [`ServiceRegistry`] holds the loaded set as an immutable snapshot that is
//! swapped atomically on reload.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`definition`] | Definition types and their wire format |
//! | [`loader`] | JSON/YAML parsing and load-time template checks |
//! | [`registry`] | Snapshot registry and file watcher |

pub mod definition;
pub mod loader;
pub mod registry;

pub use definition::{
    AddRule, CompletionTemplate, ImageGenerationLimits, ImagesConfig, MaxTokensPolicy, Measure,
    MessageTemplate, ParamSpec, ResponseFormatSpec, ServiceDefinition,
};
pub use loader::{parse_document, DocumentFormat};
pub use registry::{RegistryWatcher, ServiceRegistry};
