//! 具体类型到服务类型的转换
//!
//! `Arc<T>` 到 `Arc<dyn Trait>` 的转换无法在泛型代码中直接表达，
//! 按类型注册工厂时通过 [`Provides`] 完成这一步。

use std::sync::Arc;

/// 具体类型 `Self` 可以作为服务 `I` 提供
pub trait Provides<I: ?Sized>: Send + Sync + 'static {
    /// 把具体实例转换为服务句柄
    fn provide(self: Arc<Self>) -> Arc<I>;
}

impl<T: Send + Sync + 'static> Provides<T> for T {
    fn provide(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// 为具体类型声明它提供的服务 trait
///
/// ```rust
/// use arbor_di_abstractions::{provides, Provides};
/// use std::sync::Arc;
///
/// pub trait Logger: Send + Sync {
///     fn log(&self, message: &str);
/// }
///
/// pub struct ConsoleLogger;
///
/// impl Logger for ConsoleLogger {
///     fn log(&self, message: &str) {
///         println!("{message}");
///     }
/// }
///
/// provides!(ConsoleLogger => dyn Logger);
///
/// let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger).provide();
/// logger.log("ready");
/// ```
#[macro_export]
macro_rules! provides {
    ($concrete:ty => $($service:ty),+ $(,)?) => {
        $(
            impl $crate::Provides<$service> for $concrete {
                fn provide(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$service> {
                    self
                }
            }
        )+
    };
}
