//! 服务解析器抽象接口

use arbor_common::{downcast_service, AnyService, DependencyResult, ServiceKey};
use std::sync::Arc;
use tracing::warn;

/// 服务解析器 trait
///
/// 查找本身不会失败，找不到时返回 `None`。只有按类型构造的工厂在
/// 构造过程中注入失败时，`try_resolve_by_key` 才返回错误。
pub trait ServiceResolver: Send + Sync {
    /// 解析服务，透传工厂构造过程中的注入错误
    fn try_resolve_by_key(&self, key: &ServiceKey) -> DependencyResult<Option<AnyService>>;

    /// 检查服务是否可以解析（不会调用工厂）
    fn can_resolve_by_key(&self, key: &ServiceKey) -> bool;

    /// 解析服务，工厂构造失败时记录日志并视为不存在
    fn resolve_by_key(&self, key: &ServiceKey) -> Option<AnyService> {
        match self.try_resolve_by_key(key) {
            Ok(service) => service,
            Err(err) => {
                warn!("服务构造失败，按未注册处理: {} ({})", key, err);
                None
            }
        }
    }
}

/// [`ServiceResolver`] 的类型化扩展
pub trait ServiceResolverExt: ServiceResolver {
    /// 解析指定类型的服务
    fn get<I>(&self) -> Option<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.resolve_by_key(&ServiceKey::of::<I>())
            .and_then(|service| downcast_service::<I>(&service))
    }

    /// 检查指定类型是否可以解析
    fn can_resolve<I>(&self) -> bool
    where
        I: ?Sized + 'static,
    {
        self.can_resolve_by_key(&ServiceKey::of::<I>())
    }
}

impl<R: ServiceResolver + ?Sized> ServiceResolverExt for R {}
