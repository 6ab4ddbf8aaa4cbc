//! 作用域：注册表与解析器

use crate::factory::{closure_producer, constructing_producer, Constructible, FactoryEntry};
use arbor_common::{
    downcast_service, erase_service, AnyService, ContainerConfig, DependencyResult,
    RegistrationInfo, RegistrationKind, ScopeInfo, ServiceKey, SingletonConstruction,
};
use arbor_di_abstractions::{Provides, ServiceRegistry, ServiceResolver};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 依赖解析作用域
///
/// `Scope` 是一个廉价的句柄，克隆得到的是同一个作用域。子作用域持有
/// 父作用域的句柄，只用于查找，从不写入父作用域的表。
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    id: uuid::Uuid,
    name: String,
    depth: usize,
    created_at: chrono::DateTime<chrono::Utc>,
    config: ContainerConfig,
    parent: Option<Scope>,
    /// 已绑定的实例
    instances: DashMap<ServiceKey, AnyService>,
    /// 工厂注册项
    factories: DashMap<ServiceKey, FactoryEntry>,
    /// `Exclusive` 策略下的工厂单例构造锁
    singleton_gates: DashMap<ServiceKey, Arc<Mutex<()>>>,
    /// 用于生成子作用域名称
    child_count: AtomicUsize,
}

impl Scope {
    /// 使用默认配置创建根作用域
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建根作用域
    pub fn with_config(config: ContainerConfig) -> Self {
        let name = config.root_scope_name.clone();
        Self::from_parts(name, config, None)
    }

    /// 创建作用域构建器
    pub fn builder() -> crate::ScopeBuilder {
        crate::ScopeBuilder::new()
    }

    pub(crate) fn from_parts(name: String, config: ContainerConfig, parent: Option<Scope>) -> Self {
        let depth = parent.as_ref().map_or(0, |p| p.depth() + 1);
        let scope = Self {
            inner: Arc::new(ScopeInner {
                id: uuid::Uuid::new_v4(),
                name,
                depth,
                created_at: chrono::Utc::now(),
                config,
                parent,
                instances: DashMap::new(),
                factories: DashMap::new(),
                singleton_gates: DashMap::new(),
                child_count: AtomicUsize::new(0),
            }),
        };
        debug!("创建作用域: {} (深度 {})", scope.name(), depth);
        scope
    }

    /// 创建子作用域
    ///
    /// 子作用域的表为空，继承的是配置而不是注册。
    pub fn make_child(&self) -> Scope {
        let index = self.inner.child_count.fetch_add(1, Ordering::Relaxed);
        self.make_named_child(index.to_string())
    }

    /// 创建指定名称的子作用域，完整名称为 `父名称.name`
    pub fn make_named_child(&self, name: impl Into<String>) -> Scope {
        let name = format!("{}.{}", self.name(), name.into());
        Self::from_parts(name, self.inner.config.clone(), Some(self.clone()))
    }

    // ---------------------------------------------------------------
    // 注册
    // ---------------------------------------------------------------

    /// 注册单例实例
    pub fn register_singleton<I>(&self, instance: Arc<I>)
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let key = ServiceKey::of::<I>();
        self.log_registration(&key, RegistrationKind::Instance);
        self.inner.instances.insert(key, erase_service(instance));
    }

    /// 注册工厂，每次解析都调用一次，不缓存
    pub fn register_factory<I, F>(&self, factory: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<I> + Send + Sync + 'static,
    {
        self.insert_factory(
            ServiceKey::of::<I>(),
            FactoryEntry::per_resolution(closure_producer(factory)),
        );
    }

    /// 按类型注册工厂，每次解析都构造一个新的 `T`
    pub fn register_type<I, T>(&self)
    where
        I: ?Sized + Send + Sync + 'static,
        T: Constructible + Provides<I>,
    {
        self.insert_factory(
            ServiceKey::of::<I>(),
            FactoryEntry::per_resolution(constructing_producer::<I, T>()),
        );
    }

    /// 注册工厂单例
    ///
    /// 首次解析时调用工厂，结果写入发起解析的作用域的实例表，
    /// 之后该作用域的解析直接返回这个实例。
    pub fn register_factory_of_singleton<I, F>(&self, factory: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<I> + Send + Sync + 'static,
    {
        self.insert_factory(
            ServiceKey::of::<I>(),
            FactoryEntry::singleton(closure_producer(factory)),
        );
    }

    /// 按类型注册工厂单例
    pub fn register_type_of_singleton<I, T>(&self)
    where
        I: ?Sized + Send + Sync + 'static,
        T: Constructible + Provides<I>,
    {
        self.insert_factory(
            ServiceKey::of::<I>(),
            FactoryEntry::singleton(constructing_producer::<I, T>()),
        );
    }

    fn insert_factory(&self, key: ServiceKey, entry: FactoryEntry) {
        self.log_registration(&key, entry.kind());
        self.inner.factories.insert(key, entry);
    }

    fn log_registration(&self, key: &ServiceKey, kind: RegistrationKind) {
        if self.inner.config.log_registrations {
            debug!("注册服务: {} [{:?}] (作用域 {})", key, kind, self.name());
        }
    }

    // ---------------------------------------------------------------
    // 解析
    // ---------------------------------------------------------------

    /// 解析服务
    ///
    /// 按类型构造的工厂在构造时注入失败会被记录并视为不存在，
    /// 需要拿到错误时使用 [`Scope::try_resolve`]。
    pub fn resolve<I>(&self) -> Option<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.resolve_any(&ServiceKey::of::<I>())
            .and_then(|service| downcast_service::<I>(&service))
    }

    /// 解析服务，透传构造过程中的注入错误
    pub fn try_resolve<I>(&self) -> DependencyResult<Option<Arc<I>>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        Ok(self
            .try_resolve_any(&ServiceKey::of::<I>())?
            .and_then(|service| downcast_service::<I>(&service)))
    }

    /// 按服务标识解析
    pub fn resolve_any(&self, key: &ServiceKey) -> Option<AnyService> {
        match self.try_resolve_any(key) {
            Ok(service) => service,
            Err(err) => {
                warn!("服务构造失败，按未注册处理: {} ({})", key, err);
                None
            }
        }
    }

    /// 按服务标识解析，透传构造过程中的注入错误
    pub fn try_resolve_any(&self, key: &ServiceKey) -> DependencyResult<Option<AnyService>> {
        let mut current = self;
        loop {
            if let Some(instance) = current.inner.instances.get(key) {
                trace!("命中实例: {} (作用域 {})", key, current.name());
                return Ok(Some(instance.value().clone()));
            }

            // 先取出注册项再调用，工厂内部可能重入本作用域
            let entry = current.inner.factories.get(key).map(|e| e.value().clone());
            if let Some(entry) = entry {
                trace!("命中工厂: {} [{:?}] (作用域 {})", key, entry.kind(), current.name());
                let service = match entry.kind() {
                    RegistrationKind::FactoryOfSingleton => {
                        self.promote_singleton(key, &entry, current)?
                    }
                    _ => entry.produce(current)?,
                };
                return Ok(Some(service));
            }

            match &current.inner.parent {
                Some(parent) => current = parent,
                None => {
                    trace!("未找到服务: {} (起始作用域 {})", key, self.name());
                    return Ok(None);
                }
            }
        }
    }

    /// 执行工厂单例并写入本作用域（发起解析的作用域）
    fn promote_singleton(
        &self,
        key: &ServiceKey,
        entry: &FactoryEntry,
        owner: &Scope,
    ) -> DependencyResult<AnyService> {
        match self.inner.config.singleton_construction {
            SingletonConstruction::Relaxed => {
                let instance = entry.produce(owner)?;
                self.inner.instances.insert(*key, instance.clone());
                debug!("缓存工厂单例: {} (作用域 {})", key, self.name());
                Ok(instance)
            }
            SingletonConstruction::Exclusive => {
                let gate = self.inner.singleton_gates.entry(*key).or_default().value().clone();
                let _guard = gate.lock();

                if let Some(existing) = self.inner.instances.get(key) {
                    return Ok(existing.value().clone());
                }

                let instance = entry.produce(owner)?;
                self.inner.instances.insert(*key, instance.clone());
                debug!("缓存工厂单例: {} (作用域 {}, 独占构造)", key, self.name());
                Ok(instance)
            }
        }
    }

    /// 检查服务是否可以从本作用域链解析（不会调用工厂）
    pub fn is_registered<I>(&self) -> bool
    where
        I: ?Sized + 'static,
    {
        self.contains_key(&ServiceKey::of::<I>())
    }

    /// 检查本作用域（不含上级）是否注册了服务
    pub fn is_registered_locally<I>(&self) -> bool
    where
        I: ?Sized + 'static,
    {
        self.contains_local_key(&ServiceKey::of::<I>())
    }

    /// 检查服务标识是否可以从本作用域链解析
    pub fn contains_key(&self, key: &ServiceKey) -> bool {
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.contains_local_key(key) {
                return true;
            }
            current = scope.parent();
        }
        false
    }

    fn contains_local_key(&self, key: &ServiceKey) -> bool {
        self.inner.instances.contains_key(key) || self.inner.factories.contains_key(key)
    }

    /// 本作用域内的注册信息，按类型名称排序
    ///
    /// 同一服务同时有实例和工厂时两条都会列出。
    pub fn registrations(&self) -> Vec<RegistrationInfo> {
        let mut registrations: Vec<RegistrationInfo> = self
            .inner
            .instances
            .iter()
            .map(|entry| RegistrationInfo::new(*entry.key(), RegistrationKind::Instance))
            .chain(
                self.inner
                    .factories
                    .iter()
                    .map(|entry| RegistrationInfo::new(*entry.key(), entry.value().kind())),
            )
            .collect();
        registrations.sort_by(|a, b| {
            a.key
                .type_name()
                .cmp(b.key.type_name())
                .then_with(|| kind_order(a.kind).cmp(&kind_order(b.kind)))
        });
        registrations
    }

    // ---------------------------------------------------------------
    // 作用域信息
    // ---------------------------------------------------------------

    pub fn id(&self) -> uuid::Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 根作用域为 0
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.inner.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// 两个句柄是否指向同一个作用域
    pub fn same_scope(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 作用域快照
    pub fn info(&self) -> ScopeInfo {
        ScopeInfo {
            id: self.inner.id,
            name: self.inner.name.clone(),
            depth: self.inner.depth,
            parent_id: self.parent().map(Scope::id),
            created_at: self.inner.created_at,
        }
    }
}

fn kind_order(kind: RegistrationKind) -> u8 {
    match kind {
        RegistrationKind::Instance => 0,
        RegistrationKind::Factory => 1,
        RegistrationKind::FactoryOfSingleton => 2,
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("depth", &self.inner.depth)
            .field("instances", &self.inner.instances.len())
            .field("factories", &self.inner.factories.len())
            .finish()
    }
}

impl ServiceRegistry for Scope {
    fn register_singleton<I>(&self, instance: Arc<I>)
    where
        I: ?Sized + Send + Sync + 'static,
    {
        Scope::register_singleton(self, instance);
    }

    fn register_factory<I, F>(&self, factory: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<I> + Send + Sync + 'static,
    {
        Scope::register_factory(self, factory);
    }

    fn register_factory_of_singleton<I, F>(&self, factory: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<I> + Send + Sync + 'static,
    {
        Scope::register_factory_of_singleton(self, factory);
    }

    fn is_registered_locally_by_key(&self, key: &ServiceKey) -> bool {
        self.contains_local_key(key)
    }

    fn registrations(&self) -> Vec<RegistrationInfo> {
        Scope::registrations(self)
    }
}

impl ServiceResolver for Scope {
    fn try_resolve_by_key(&self, key: &ServiceKey) -> DependencyResult<Option<AnyService>> {
        self.try_resolve_any(key)
    }

    fn can_resolve_by_key(&self, key: &ServiceKey) -> bool {
        self.contains_key(key)
    }
}
