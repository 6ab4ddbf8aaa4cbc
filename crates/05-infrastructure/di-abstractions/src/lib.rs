//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务注册、解析和成员注入的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceRegistry`] - 服务注册表接口
//! - [`ServiceResolver`] - 服务解析器接口
//! - [`IntrospectionProvider`] - 成员描述提供者（替代运行时反射）
//! - [`Injectable`] - 自描述可注入成员的类型
//! - [`Provides`] - 具体类型到服务类型的转换

pub mod introspection;
pub mod provides;
pub mod registry;
pub mod resolver;

pub use introspection::*;
pub use provides::*;
pub use registry::*;
pub use resolver::*;

pub use arbor_common::{
    downcast_service, erase_service, AnyService, DependencyError, DependencyResult,
    RegistrationInfo, RegistrationKind, ServiceKey,
};
