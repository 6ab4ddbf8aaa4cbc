//! 作用域构建器

use crate::scope::Scope;
use arbor_common::{ContainerConfig, SingletonConstruction};

/// 作用域构建器
///
/// 使用建造者模式创建根作用域，或以自定义配置创建子作用域。
#[derive(Debug, Default)]
pub struct ScopeBuilder {
    name: Option<String>,
    config: Option<ContainerConfig>,
    parent: Option<Scope>,
    singleton_construction: Option<SingletonConstruction>,
}

impl ScopeBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置作用域名称；有父作用域时会加上父名称前缀
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 使用指定配置，未设置时根作用域用默认配置，子作用域继承父配置
    pub fn config(mut self, config: ContainerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 覆盖工厂单例构造策略
    pub fn singleton_construction(mut self, strategy: SingletonConstruction) -> Self {
        self.singleton_construction = Some(strategy);
        self
    }

    /// 设置父作用域
    pub fn parent(mut self, parent: &Scope) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// 构建作用域
    pub fn build(self) -> Scope {
        let mut config = match (self.config, &self.parent) {
            (Some(config), _) => config,
            (None, Some(parent)) => parent.config().clone(),
            (None, None) => ContainerConfig::default(),
        };
        if let Some(strategy) = self.singleton_construction {
            config.singleton_construction = strategy;
        }

        let name = match (&self.parent, self.name) {
            (Some(parent), Some(name)) => format!("{}.{}", parent.name(), name),
            (Some(parent), None) => format!("{}.scope", parent.name()),
            (None, Some(name)) => name,
            (None, None) => config.root_scope_name.clone(),
        };

        Scope::from_parts(name, config, self.parent)
    }
}
