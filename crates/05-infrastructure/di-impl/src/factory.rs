//! 工厂注册项与按类型构造

use crate::scope::Scope;
use arbor_common::{erase_service, AnyService, DependencyResult, RegistrationKind};
use arbor_di_abstractions::Provides;
use std::fmt;
use std::sync::Arc;

/// 按类型注册时使用的构造方式
///
/// 无参构造的类型直接忽略 `scope`；需要继续解析或注册依赖的类型
/// 可以保存 `scope.clone()` 或在构造时调用
/// [`Scope::resolve_dependencies`]。传入的是注册工厂的那个作用域。
pub trait Constructible: Send + Sync + Sized + 'static {
    /// 构造新实例
    fn construct(scope: &Scope) -> DependencyResult<Self>;
}

/// 工厂函数，参数为持有该注册项的作用域
pub(crate) type Producer = Arc<dyn Fn(&Scope) -> DependencyResult<AnyService> + Send + Sync>;

/// 工厂注册项
#[derive(Clone)]
pub(crate) struct FactoryEntry {
    kind: RegistrationKind,
    producer: Producer,
}

impl FactoryEntry {
    /// 每次解析都调用的工厂
    pub(crate) fn per_resolution(producer: Producer) -> Self {
        Self {
            kind: RegistrationKind::Factory,
            producer,
        }
    }

    /// 首次解析后缓存的工厂
    pub(crate) fn singleton(producer: Producer) -> Self {
        Self {
            kind: RegistrationKind::FactoryOfSingleton,
            producer,
        }
    }

    pub(crate) fn kind(&self) -> RegistrationKind {
        self.kind
    }

    pub(crate) fn produce(&self, owner: &Scope) -> DependencyResult<AnyService> {
        (self.producer)(owner)
    }
}

impl fmt::Debug for FactoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryEntry")
            .field("kind", &self.kind)
            .field("producer", &"<function>")
            .finish()
    }
}

/// 包装无参闭包
pub(crate) fn closure_producer<I, F>(factory: F) -> Producer
where
    I: ?Sized + Send + Sync + 'static,
    F: Fn() -> Arc<I> + Send + Sync + 'static,
{
    Arc::new(move |_owner: &Scope| Ok(erase_service(factory())))
}

/// 按类型构造 `T` 并作为服务 `I` 提供
pub(crate) fn constructing_producer<I, T>() -> Producer
where
    I: ?Sized + Send + Sync + 'static,
    T: Constructible + Provides<I>,
{
    Arc::new(|owner: &Scope| {
        let instance = Arc::new(T::construct(owner)?);
        Ok(erase_service(<T as Provides<I>>::provide(instance)))
    })
}
