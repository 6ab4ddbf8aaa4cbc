//! Centralized integration tests for arbor-di-impl
use arbor_common::{DependencyError, RegistrationKind, ServiceKey};
use arbor_di_abstractions::{ServiceResolver, ServiceResolverExt};
use arbor_di_impl::{DependencyResult, Scope};
use arbor_di_macros::{Constructible, Injectable};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

trait Logger: Send + Sync {
    fn tag(&self) -> &str;
}

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

trait Handler: Send + Sync {
    fn handle(&self) -> String;
}

/// 测试日志
#[derive(Debug)]
struct TagLogger(&'static str);

impl Logger for TagLogger {
    fn tag(&self) -> &str {
        self.0
    }
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

fn logger(tag: &'static str) -> Arc<dyn Logger> {
    Arc::new(TagLogger(tag))
}

/// 带必需和可选依赖的服务
#[derive(Default, Injectable)]
struct Worker {
    #[dependency]
    logger: Option<Arc<dyn Logger>>,
    #[dependency(optional)]
    clock: Option<Arc<dyn Clock>>,
}

/// 通过属性注入时钟
#[derive(Default, Injectable)]
#[injectable(property(name = "clock", ty = "dyn Clock", getter = "clock", setter = "set_clock"))]
#[injectable(property(name = "audit", ty = "dyn Logger", getter = "audit"))]
struct Scheduler {
    #[dependency]
    logger: Option<Arc<dyn Logger>>,
    clock: Option<Arc<dyn Clock>>,
    order: Vec<&'static str>,
}

impl Scheduler {
    fn clock(&self) -> Option<&Arc<dyn Clock>> {
        self.clock.as_ref()
    }

    fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.order.push("clock");
        self.clock = Some(clock);
    }

    fn audit(&self) -> Option<&Arc<dyn Logger>> {
        self.logger.as_ref()
    }
}

/// 构造时自行注入依赖
#[derive(Default, Injectable, Constructible)]
#[constructible(inject, provides = "dyn Handler")]
struct RequestHandler {
    #[dependency]
    logger: Option<Arc<dyn Logger>>,
}

impl Handler for RequestHandler {
    fn handle(&self) -> String {
        match &self.logger {
            Some(logger) => format!("handled by {}", logger.tag()),
            None => "unhandled".to_string(),
        }
    }
}

/// 记住构造它的作用域
#[derive(Constructible)]
#[constructible(with_scope = "from_scope")]
struct ScopeProbe {
    owner: Scope,
}

impl ScopeProbe {
    fn from_scope(scope: &Scope) -> DependencyResult<Self> {
        Ok(Self {
            owner: scope.clone(),
        })
    }
}

#[derive(Constructible)]
#[constructible(new, provides = "dyn Clock")]
struct SystemClock {
    started: u64,
}

impl SystemClock {
    fn new() -> Self {
        Self { started: 42 }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        self.started
    }
}

#[test]
fn test_singleton_identity_across_scopes() {
    let root = Scope::new();
    let l1 = logger("L1");
    root.register_singleton::<dyn Logger>(l1.clone());

    let child = root.make_child();
    let from_root = root.resolve::<dyn Logger>().unwrap();
    let from_child = child.resolve::<dyn Logger>().unwrap();

    assert!(Arc::ptr_eq(&l1, &from_root));
    assert!(Arc::ptr_eq(&l1, &from_child));
}

#[test]
fn test_factory_produces_fresh_values() {
    let calls = Arc::new(AtomicU32::new(0));
    let root = Scope::new();
    let counter = calls.clone();
    root.register_factory::<dyn Clock, _>(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Arc::new(FixedClock(u64::from(n))) as Arc<dyn Clock>
    });

    let first = root.resolve::<dyn Clock>().unwrap();
    let second = root.resolve::<dyn Clock>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!((first.now(), second.now()), (1, 2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_factory_of_singleton_caches_in_invoking_scope() {
    let calls = Arc::new(AtomicU32::new(0));
    let root = Scope::new();
    let counter = calls.clone();
    root.register_factory_of_singleton::<dyn Clock, _>(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Arc::new(FixedClock(7)) as Arc<dyn Clock>
    });

    let child = root.make_child();
    let first = child.resolve::<dyn Clock>().unwrap();
    let second = child.resolve::<dyn Clock>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // 缓存写在子作用域，根作用域仍只有工厂
    assert!(child.is_registered_locally::<dyn Clock>());
    assert!(!root
        .registrations()
        .iter()
        .any(|r| r.kind == RegistrationKind::Instance));

    let from_root = root.resolve::<dyn Clock>().unwrap();
    assert!(!Arc::ptr_eq(&first, &from_root));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_child_override_leaves_parent_untouched() {
    let root = Scope::new();
    root.register_singleton::<dyn Logger>(logger("root"));

    let child = root.make_child();
    child.register_singleton::<dyn Logger>(logger("child"));

    assert_eq!(child.resolve::<dyn Logger>().unwrap().tag(), "child");
    assert_eq!(root.resolve::<dyn Logger>().unwrap().tag(), "root");
}

#[test]
fn test_grandchild_falls_back_to_root() {
    let root = Scope::new();
    root.register_singleton::<dyn Logger>(logger("root"));
    root.register_factory::<dyn Clock, _>(|| Arc::new(FixedClock(5)) as Arc<dyn Clock>);

    let grandchild = root.make_child().make_child();

    assert_eq!(grandchild.depth(), 2);
    assert_eq!(grandchild.resolve::<dyn Logger>().unwrap().tag(), "root");
    assert_eq!(grandchild.resolve::<dyn Clock>().unwrap().now(), 5);
    assert!(grandchild.registrations().is_empty());
}

#[test]
fn test_instance_outranks_factory() {
    let calls = Arc::new(AtomicU32::new(0));
    let scope = Scope::new();
    let counter = calls.clone();
    scope.register_factory::<dyn Logger, _>(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        logger("factory")
    });
    scope.register_singleton::<dyn Logger>(logger("instance"));

    assert_eq!(scope.resolve::<dyn Logger>().unwrap().tag(), "instance");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_nearest_factory_outranks_ancestor_instance() {
    let root = Scope::new();
    root.register_singleton::<dyn Logger>(logger("root"));

    let child = root.make_child();
    child.register_factory::<dyn Logger, _>(|| logger("child-factory"));

    assert_eq!(child.resolve::<dyn Logger>().unwrap().tag(), "child-factory");
}

#[test]
fn test_unregistered_resolves_to_none() {
    let scope = Scope::new().make_child();
    assert!(scope.resolve::<dyn Logger>().is_none());
    assert!(!scope.is_registered::<dyn Logger>());
}

#[test]
fn test_required_absent_names_the_type() {
    let scope = Scope::new().make_child();
    let mut worker = Worker::default();

    let err = scope.resolve_dependencies(&mut worker).unwrap_err();
    assert_eq!(err.key(), &ServiceKey::of::<dyn Logger>());
    assert!(err.to_string().contains("Logger"));
    assert!(worker.logger.is_none());
}

#[test]
fn test_optional_absent_leaves_member_untouched() -> anyhow::Result<()> {
    let scope = Scope::new();
    scope.register_singleton::<dyn Logger>(logger("L1"));

    let preset: Arc<dyn Clock> = Arc::new(FixedClock(3));
    let mut worker = Worker {
        logger: None,
        clock: Some(preset.clone()),
    };
    scope.resolve_dependencies(&mut worker)?;

    assert_eq!(worker.logger.as_ref().map(|l| l.tag()), Some("L1"));
    assert!(Arc::ptr_eq(worker.clock.as_ref().unwrap(), &preset));
    Ok(())
}

#[test]
fn test_logger_example_with_orphan_scope() -> anyhow::Result<()> {
    let root = Scope::new();
    let l1 = logger("L1");
    root.register_singleton::<dyn Logger>(l1.clone());

    let child = root.make_child();
    let mut worker = Worker::default();
    child.resolve_dependencies(&mut worker)?;
    assert!(Arc::ptr_eq(worker.logger.as_ref().unwrap(), &l1));

    let orphan = Scope::new();
    let mut stray = Worker::default();
    let err = orphan.resolve_dependencies(&mut stray).unwrap_err();
    assert_eq!(
        err,
        DependencyError::not_resolved(ServiceKey::of::<dyn Logger>(), "logger")
    );
    Ok(())
}

#[test]
fn test_derived_properties_follow_fields() -> anyhow::Result<()> {
    let scope = Scope::new();
    scope.register_singleton::<dyn Logger>(logger("L1"));
    scope.register_singleton::<dyn Clock>(Arc::new(FixedClock(9)));

    let mut scheduler = Scheduler::default();
    scope.resolve_dependencies(&mut scheduler)?;

    assert_eq!(scheduler.logger.as_ref().map(|l| l.tag()), Some("L1"));
    assert_eq!(scheduler.clock().map(|c| c.now()), Some(9));
    // 没有 setter 的 audit 属性被跳过
    assert_eq!(scheduler.order, vec!["clock"]);
    assert!(scheduler.audit().is_some());
    Ok(())
}

#[test]
fn test_register_type_injects_from_registering_scope() -> anyhow::Result<()> {
    let root = Scope::new();
    root.register_singleton::<dyn Logger>(logger("root"));
    root.register_type::<dyn Handler, RequestHandler>();

    let child = root.make_child();
    child.register_singleton::<dyn Logger>(logger("child"));

    let handler = child.try_resolve::<dyn Handler>()?.unwrap();
    assert_eq!(handler.handle(), "handled by root");
    Ok(())
}

#[test]
fn test_register_type_propagates_injection_failure() {
    let root = Scope::new();
    root.register_type::<dyn Handler, RequestHandler>();

    let err = root.try_resolve::<dyn Handler>().err().unwrap();
    assert_eq!(err.key(), &ServiceKey::of::<dyn Logger>());
    assert!(root.resolve::<dyn Handler>().is_none());
}

#[test]
fn test_constructor_receives_registering_scope() {
    let root = Scope::new();
    root.register_type::<ScopeProbe, ScopeProbe>();

    let child = root.make_child();
    let probe = child.resolve::<ScopeProbe>().unwrap();
    assert!(probe.owner.same_scope(&root));
}

#[test]
fn test_type_of_singleton_with_new_constructor() {
    let root = Scope::new();
    root.register_type_of_singleton::<dyn Clock, SystemClock>();

    let first = root.resolve::<dyn Clock>().unwrap();
    let second = root.resolve::<dyn Clock>().unwrap();
    assert_eq!(first.now(), 42);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_resolution_through_resolver_contract() {
    let root = Scope::new();
    root.register_singleton::<dyn Logger>(logger("contract"));
    let child = root.make_child();

    let resolver: &dyn ServiceResolver = &child;
    assert!(resolver.can_resolve::<dyn Logger>());
    assert!(!resolver.can_resolve::<dyn Clock>());
    assert_eq!(resolver.get::<dyn Logger>().unwrap().tag(), "contract");
}

#[test]
fn test_scope_info_links_parent() {
    let root = Scope::builder().name("app").build();
    let child = root.make_named_child("request");

    let info = child.info();
    assert_eq!(info.name, "app.request");
    assert_eq!(info.depth, 1);
    assert_eq!(info.parent_id, Some(root.id()));
    assert!(!info.is_root());
    assert!(root.info().is_root());
}
