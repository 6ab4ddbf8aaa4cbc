//! 错误类型定义

use crate::metadata::ServiceKey;
use thiserror::Error;

/// 依赖注入错误类型
///
/// 只会在成员注入时产生；服务查找本身只返回 `None`。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("依赖未能解析: {} (成员 `{}`)", .key.short_name(), .member)]
    DependencyNotResolved { key: ServiceKey, member: String },
}

impl DependencyError {
    /// 创建依赖未解析错误
    pub fn not_resolved(key: ServiceKey, member: impl Into<String>) -> Self {
        Self::DependencyNotResolved {
            key,
            member: member.into(),
        }
    }

    /// 未能解析的服务标识
    pub fn key(&self) -> &ServiceKey {
        match self {
            Self::DependencyNotResolved { key, .. } => key,
        }
    }

    /// 未能解析的服务类型名称
    pub fn type_name(&self) -> &'static str {
        self.key().type_name()
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置加载失败: {source}")]
    LoadError {
        #[from]
        source: config::ConfigError,
    },

    #[error("TOML 配置解析失败: {source}")]
    TomlError {
        #[from]
        source: toml::de::Error,
    },

    #[error("JSON 配置解析失败: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
