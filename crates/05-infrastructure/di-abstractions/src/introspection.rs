//! 成员描述抽象接口
//!
//! 描述一个对象上哪些成员可以被注入。描述可以手写、由
//! `#[derive(Injectable)]` 生成，或者通过 [`DescriptorTable`] 按需构建。

use arbor_common::{downcast_service, AnyService, ServiceKey};
use std::fmt;
use std::sync::Arc;

/// 成员类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// 字段，直接赋值
    Field,
    /// 属性，通过 setter 写入
    Property,
}

/// 可注入依赖标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependencyMarker {
    /// 解析不到时是否允许保持原值
    pub is_optional: bool,
}

impl DependencyMarker {
    /// 必需依赖
    pub const fn required() -> Self {
        Self { is_optional: false }
    }

    /// 可选依赖
    pub const fn optional() -> Self {
        Self { is_optional: true }
    }
}

/// 类型擦除后的成员写入函数，服务类型不匹配时返回 `false`
pub type MemberSetter<T> = Arc<dyn Fn(&mut T, &AnyService) -> bool + Send + Sync>;

/// 成员描述符
pub struct MemberDescriptor<T> {
    name: &'static str,
    kind: MemberKind,
    key: ServiceKey,
    marker: Option<DependencyMarker>,
    readable: bool,
    setter: Option<MemberSetter<T>>,
}

impl<T: 'static> MemberDescriptor<T> {
    /// 描述一个字段，`assign` 负责把解析到的服务写入字段
    pub fn field<I, F>(name: &'static str, assign: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<I>) + Send + Sync + 'static,
    {
        Self {
            name,
            kind: MemberKind::Field,
            key: ServiceKey::of::<I>(),
            marker: None,
            readable: true,
            setter: Some(typed_setter(assign)),
        }
    }

    /// 描述一个可读写属性
    pub fn property<I, F>(name: &'static str, setter: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<I>) + Send + Sync + 'static,
    {
        Self {
            name,
            kind: MemberKind::Property,
            key: ServiceKey::of::<I>(),
            marker: None,
            readable: true,
            setter: Some(typed_setter(setter)),
        }
    }

    /// 描述一个只读属性（注入时总是跳过）
    pub fn read_only_property<I>(name: &'static str) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            name,
            kind: MemberKind::Property,
            key: ServiceKey::of::<I>(),
            marker: None,
            readable: true,
            setter: None,
        }
    }

    /// 描述一个只写属性（注入时总是跳过）
    pub fn write_only_property<I, F>(name: &'static str, setter: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<I>) + Send + Sync + 'static,
    {
        Self {
            readable: false,
            ..Self::property(name, setter)
        }
    }
}

impl<T> MemberDescriptor<T> {
    /// 标记为必需依赖
    pub fn required(self) -> Self {
        self.with_marker(DependencyMarker::required())
    }

    /// 标记为可选依赖
    pub fn optional(self) -> Self {
        self.with_marker(DependencyMarker::optional())
    }

    /// 设置依赖标记
    pub fn with_marker(mut self, marker: DependencyMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// 成员声明的服务类型
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    pub fn marker(&self) -> Option<DependencyMarker> {
        self.marker
    }

    pub fn is_marked(&self) -> bool {
        self.marker.is_some()
    }

    /// 是否可以写入：字段需要写入函数，属性需要同时可读可写
    pub fn is_injectable(&self) -> bool {
        self.setter.is_some() && self.readable
    }

    /// 写入解析到的服务
    pub fn assign(&self, target: &mut T, service: &AnyService) -> bool {
        match &self.setter {
            Some(setter) => setter(target, service),
            None => false,
        }
    }
}

impl<T> Clone for MemberDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            key: self.key,
            marker: self.marker,
            readable: self.readable,
            setter: self.setter.clone(),
        }
    }
}

impl<T> fmt::Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("marker", &self.marker)
            .field("readable", &self.readable)
            .field("setter", &self.setter.as_ref().map(|_| "<function>"))
            .finish()
    }
}

fn typed_setter<T, I, F>(assign: F) -> MemberSetter<T>
where
    T: 'static,
    I: ?Sized + Send + Sync + 'static,
    F: Fn(&mut T, Arc<I>) + Send + Sync + 'static,
{
    Arc::new(move |target: &mut T, service: &AnyService| {
        match downcast_service::<I>(service) {
            Some(value) => {
                assign(target, value);
                true
            }
            None => false,
        }
    })
}

/// 成员描述提供者 trait
///
/// 给出目标类型自身声明的成员（不包含嵌套结构体的成员）。
pub trait IntrospectionProvider<T>: Send + Sync {
    /// 按声明顺序返回成员描述
    fn describe_members(&self) -> Vec<MemberDescriptor<T>>;
}

/// 自描述可注入成员的类型
pub trait Injectable: Sized + 'static {
    /// 按声明顺序返回成员描述
    fn describe_members() -> Vec<MemberDescriptor<Self>>;
}

/// 使用类型自身 [`Injectable`] 实现的提供者
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMembers;

impl<T: Injectable> IntrospectionProvider<T> for DeclaredMembers {
    fn describe_members(&self) -> Vec<MemberDescriptor<T>> {
        T::describe_members()
    }
}

/// 通过构建器注册的成员描述表
pub struct DescriptorTable<T> {
    members: Vec<MemberDescriptor<T>>,
}

impl<T> DescriptorTable<T> {
    /// 创建空的描述表
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// 追加成员描述
    pub fn with_member(mut self, member: MemberDescriptor<T>) -> Self {
        self.members.push(member);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> Default for DescriptorTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DescriptorTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorTable")
            .field("members", &self.members)
            .finish()
    }
}

impl<T> IntrospectionProvider<T> for DescriptorTable<T> {
    fn describe_members(&self) -> Vec<MemberDescriptor<T>> {
        self.members.clone()
    }
}
