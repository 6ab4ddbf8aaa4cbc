//! 容器配置
//!
//! 配置按 默认值 → 配置文件 → 环境变量 的顺序叠加。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ARBOR_DI";

/// 工厂单例的首次构造策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingletonConstruction {
    /// 并发的首次解析可能各自执行一次工厂，后写入者覆盖先写入者，
    /// 每个调用者都拿到一个完整构造的实例（不保证是同一个）。
    #[default]
    Relaxed,
    /// 在调用作用域内按服务加锁，保证每个作用域只构造一次。
    Exclusive,
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 根作用域名称，子作用域名称以它为前缀
    pub root_scope_name: String,
    /// 工厂单例构造策略
    pub singleton_construction: SingletonConstruction,
    /// 是否记录注册日志
    pub log_registrations: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            root_scope_name: "root".to_string(),
            singleton_construction: SingletonConstruction::Relaxed,
            log_registrations: true,
        }
    }
}

impl ContainerConfig {
    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 给定的文件必须存在；环境变量形如 `ARBOR_DI_SINGLETON_CONSTRUCTION=exclusive`。
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let defaults = config::Config::try_from(&Self::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载容器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.root_scope_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "root_scope_name 不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 设置根作用域名称
    pub fn with_root_scope_name(mut self, name: impl Into<String>) -> Self {
        self.root_scope_name = name.into();
        self
    }

    /// 设置工厂单例构造策略
    pub fn with_singleton_construction(mut self, strategy: SingletonConstruction) -> Self {
        self.singleton_construction = strategy;
        self
    }

    /// 设置是否记录注册日志
    pub fn with_log_registrations(mut self, enabled: bool) -> Self {
        self.log_registrations = enabled;
        self
    }
}
