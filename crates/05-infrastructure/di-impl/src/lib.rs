//! # 层级作用域容器实现
//!
//! [`Scope`] 同时是注册表和解析器。作用域组成一棵树：
//!
//! - 解析时先查本作用域的实例表，再查工厂表，最后沿父作用域向根回退
//! - 子作用域只能新增或覆盖自己的注册，不会修改父作用域
//! - 工厂单例在首次解析时写入发起解析的作用域
//!
//! ```rust
//! use arbor_di_impl::Scope;
//! use std::sync::Arc;
//!
//! pub trait Logger: Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! struct StdoutLogger;
//!
//! impl Logger for StdoutLogger {
//!     fn name(&self) -> &str {
//!         "stdout"
//!     }
//! }
//!
//! let root = Scope::new();
//! let logger: Arc<dyn Logger> = Arc::new(StdoutLogger);
//! root.register_singleton::<dyn Logger>(logger.clone());
//!
//! let request = root.make_child();
//! let resolved = request.resolve::<dyn Logger>().unwrap();
//! assert!(Arc::ptr_eq(&logger, &resolved));
//! ```

mod builder;
mod factory;
mod injection;
mod scope;

pub use builder::ScopeBuilder;
pub use factory::Constructible;
pub use scope::Scope;

pub use arbor_common::{
    ContainerConfig, DependencyError, DependencyResult, RegistrationInfo, RegistrationKind,
    ScopeInfo, ServiceKey, SingletonConstruction,
};
pub use arbor_di_abstractions::{
    provides, DeclaredMembers, DescriptorTable, DependencyMarker, Injectable,
    IntrospectionProvider, MemberDescriptor, MemberKind, Provides, ServiceRegistry,
    ServiceResolver, ServiceResolverExt,
};
