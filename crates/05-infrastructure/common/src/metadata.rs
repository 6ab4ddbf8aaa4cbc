//! 元数据定义
//!
//! 提供服务标识和类型擦除后的服务句柄

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 服务标识
///
/// 命名一个服务的抽象类型（通常是 `dyn Trait`）。两个标识相等当且仅当
/// 它们指向同一个类型；类型名称只用于诊断输出。
#[derive(Clone, Copy)]
pub struct ServiceKey {
    id: TypeId,
    type_name: &'static str,
}

impl ServiceKey {
    /// 从类型获取服务标识
    pub fn of<I: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<I>(),
            type_name: std::any::type_name::<I>(),
        }
    }

    /// 完整类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 获取简短的类型名称（不包含模块路径）
    ///
    /// `dyn app::Logger` 得到 `dyn Logger`。
    pub fn short_name(&self) -> String {
        let (prefix, path) = match self.type_name.strip_prefix("dyn ") {
            Some(rest) => ("dyn ", rest),
            None => ("", self.type_name),
        };
        // 泛型参数里也可能有 `::`，只截取尖括号之前的路径
        let head_end = path.find('<').unwrap_or(path.len());
        let (head, generics) = path.split_at(head_end);
        let short = head.rsplit("::").next().unwrap_or(head);
        format!("{prefix}{short}{generics}")
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceKey").field(&self.type_name).finish()
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 类型擦除后的服务句柄
///
/// 内部保存的是 `Arc<I>`，其中 `I` 为注册时使用的服务标识类型。
pub type AnyService = Arc<dyn Any + Send + Sync>;

/// 把具体服务包装为类型擦除句柄
pub fn erase_service<I>(service: Arc<I>) -> AnyService
where
    I: ?Sized + Send + Sync + 'static,
{
    Arc::new(service)
}

/// 从类型擦除句柄恢复服务
///
/// 句柄不是以 `I` 注册时返回 `None`。
pub fn downcast_service<I>(service: &AnyService) -> Option<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    service.downcast_ref::<Arc<I>>().cloned()
}
