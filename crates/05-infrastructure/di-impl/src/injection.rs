//! 成员注入

use crate::scope::Scope;
use arbor_common::{DependencyError, DependencyResult};
use arbor_di_abstractions::{DeclaredMembers, Injectable, IntrospectionProvider, MemberKind};
use tracing::{debug, trace, warn};

impl Scope {
    /// 为目标对象注入依赖，成员由目标类型自身描述
    ///
    /// 通常在目标的构造函数里调用：先用空成员构造出对象，再把它交给
    /// 作用域。在调用之前不要读取待注入的成员。
    pub fn resolve_dependencies<T: Injectable>(&self, target: &mut T) -> DependencyResult<()> {
        self.resolve_dependencies_with(target, &DeclaredMembers)
    }

    /// 使用指定的成员描述提供者注入依赖
    ///
    /// 先处理全部字段，再处理全部属性，各自保持提供者给出的顺序。
    /// 没有标记的成员不会被触碰；缺少 getter 或 setter 的属性即使有标记
    /// 也会跳过。必需成员解析失败时立即返回错误，此前已写入的成员保持写入
    /// 状态。
    pub fn resolve_dependencies_with<T: 'static>(
        &self,
        target: &mut T,
        provider: &dyn IntrospectionProvider<T>,
    ) -> DependencyResult<()> {
        let (fields, properties): (Vec<_>, Vec<_>) = provider
            .describe_members()
            .into_iter()
            .partition(|member| member.kind() == MemberKind::Field);

        let mut injected = 0_usize;
        for member in fields.iter().chain(properties.iter()) {
            let Some(marker) = member.marker() else {
                continue;
            };
            if !member.is_injectable() {
                trace!("跳过不可写成员: {}::{}", std::any::type_name::<T>(), member.name());
                continue;
            }

            let assigned = match self.try_resolve_any(member.key())? {
                Some(service) => member.assign(target, &service),
                None => false,
            };

            if assigned {
                injected += 1;
            } else if marker.is_optional {
                trace!("可选依赖未注册，保持原值: {} ({})", member.name(), member.key());
            } else {
                warn!(
                    "必需依赖未能解析: {} (成员 {}::{}, 作用域 {})",
                    member.key(),
                    std::any::type_name::<T>(),
                    member.name(),
                    self.name()
                );
                return Err(DependencyError::not_resolved(*member.key(), member.name()));
            }
        }

        debug!(
            "完成依赖注入: {} ({} 个成员, 作用域 {})",
            std::any::type_name::<T>(),
            injected,
            self.name()
        );
        Ok(())
    }
}
