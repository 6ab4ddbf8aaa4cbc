//! # Arbor Common
//!
//! 这个 crate 提供了 Arbor DI 各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`ServiceKey`] - 服务标识（抽象类型的身份）
//! - [`AnyService`] - 类型擦除后的服务句柄
//! - [`RegistrationKind`] - 注册类型
//! - [`ContainerConfig`] - 容器配置
//! - [`DependencyError`] - 依赖注入错误
//!
//! ## 设计原则
//!
//! - 基于 `TypeId` 的服务标识，不依赖运行时反射
//! - 作用域显式传递，不提供全局容器

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
