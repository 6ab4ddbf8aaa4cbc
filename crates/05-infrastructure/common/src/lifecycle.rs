//! 注册与作用域的生命周期描述

use crate::metadata::ServiceKey;
use serde::Serialize;

/// 注册类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RegistrationKind {
    /// 已绑定的单例实例
    Instance,
    /// 每次解析都调用的工厂
    Factory,
    /// 首次解析时创建并缓存到调用作用域的工厂
    FactoryOfSingleton,
}

/// 注册信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    /// 服务标识
    pub key: ServiceKey,
    /// 注册类型
    pub kind: RegistrationKind,
}

impl RegistrationInfo {
    /// 创建新的注册信息
    pub fn new(key: ServiceKey, kind: RegistrationKind) -> Self {
        Self { key, kind }
    }
}

/// 作用域快照
#[derive(Debug, Clone, Serialize)]
pub struct ScopeInfo {
    pub id: uuid::Uuid,
    pub name: String,
    /// 根作用域为 0
    pub depth: usize,
    pub parent_id: Option<uuid::Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ScopeInfo {
    /// 是否为根作用域
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
