//! # 作用域演示程序
//!
//! 演示根作用域、请求作用域和按类型注册的服务如何协同工作

use anyhow::Context;
use arbor_di_impl::{ContainerConfig, DependencyResult, Scope};
use arbor_di_macros::{Constructible, Injectable};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "scope-demo")]
#[command(about = "Arbor DI 作用域演示")]
struct Args {
    /// 容器配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 未设置 RUST_LOG 时使用的日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 模拟的请求数量
    #[arg(long, default_value_t = 3)]
    requests: u32,
}

pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

pub trait RequestIds: Send + Sync {
    fn next(&self) -> u64;
}

pub trait Handler: Send + Sync {
    fn handle(&self, path: &str);
}

struct TracingLogger {
    prefix: String,
}

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        info!("[{}] {}", self.prefix, message);
    }
}

#[derive(Default)]
struct SequentialIds(AtomicU64);

impl RequestIds for SequentialIds {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// 每个请求作用域构造一次的处理器
#[derive(Default, Injectable, Constructible)]
#[constructible(inject, provides = "dyn Handler")]
struct RequestHandler {
    #[dependency]
    logger: Option<Arc<dyn Logger>>,
    #[dependency(optional)]
    ids: Option<Arc<dyn RequestIds>>,
}

impl Handler for RequestHandler {
    fn handle(&self, path: &str) {
        let id = self.ids.as_ref().map_or(0, |ids| ids.next());
        if let Some(logger) = &self.logger {
            logger.log(&format!("请求 #{id}: {path}"));
        }
    }
}

/// 演示从构造作用域读取配置的服务
#[derive(Constructible)]
#[constructible(with_scope = "from_scope")]
struct ScopeReport {
    scope_name: String,
    depth: usize,
}

impl ScopeReport {
    fn from_scope(scope: &Scope) -> DependencyResult<Self> {
        Ok(Self {
            scope_name: scope.name().to_string(),
            depth: scope.depth(),
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ContainerConfig::load(args.config.as_deref()).context("加载容器配置失败")?;
    info!(
        "启动作用域演示 (根作用域 {}, 构造策略 {:?})",
        config.root_scope_name, config.singleton_construction
    );

    let root = Scope::with_config(config);
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger {
        prefix: root.name().to_string(),
    });
    root.register_singleton::<dyn Logger>(logger);
    root.register_factory_of_singleton::<dyn RequestIds, _>(|| {
        Arc::new(SequentialIds::default()) as Arc<dyn RequestIds>
    });
    root.register_type::<ScopeReport, ScopeReport>();

    // 在根作用域解析一次，请求作用域共享同一个计数器
    root.resolve::<dyn RequestIds>().context("请求编号服务未注册")?;

    for n in 0..args.requests {
        let request = root.make_named_child(format!("request-{n}"));
        request.register_type_of_singleton::<dyn Handler, RequestHandler>();

        let handler = request
            .try_resolve::<dyn Handler>()?
            .context("处理器未注册")?;
        handler.handle(&format!("/items/{n}"));
    }

    if let Some(report) = root.resolve::<ScopeReport>() {
        info!("报告来自作用域 {} (深度 {})", report.scope_name, report.depth);
    }

    let orphan = Scope::new();
    orphan.register_type::<dyn Handler, RequestHandler>();
    if let Err(err) = orphan.try_resolve::<dyn Handler>() {
        warn!("孤立作用域无法构造处理器: {}", err);
    }

    for registration in root.registrations() {
        info!("根作用域注册: {} [{:?}]", registration.key, registration.kind);
    }

    Ok(())
}
