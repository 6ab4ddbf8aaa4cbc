//! 服务注册表抽象接口

use arbor_common::{RegistrationInfo, ServiceKey};
use std::sync::Arc;

/// 服务注册表 trait
///
/// 所有注册都通过共享引用完成，实现必须允许并发注册。
/// 同一服务在同一张表中重复注册时后者覆盖前者。
pub trait ServiceRegistry: Send + Sync {
    /// 注册单例实例
    fn register_singleton<I>(&self, instance: Arc<I>)
    where
        I: ?Sized + Send + Sync + 'static;

    /// 注册工厂，每次解析都会调用
    fn register_factory<I, F>(&self, factory: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<I> + Send + Sync + 'static;

    /// 注册工厂单例，首次解析时调用并缓存到发起解析的注册表
    fn register_factory_of_singleton<I, F>(&self, factory: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<I> + Send + Sync + 'static;

    /// 检查本注册表（不含上级）是否注册了指定服务
    fn is_registered_locally_by_key(&self, key: &ServiceKey) -> bool;

    /// 获取本注册表内的所有注册信息
    fn registrations(&self) -> Vec<RegistrationInfo>;
}
