//! # Arbor DI Macros
//!
//! 为依赖注入生成编译时成员描述和构造代码。
//!
//! ## 核心宏
//!
//! - [`Injectable`] - 从字段标记生成成员描述
//! - [`Constructible`] - 生成按类型注册所需的构造函数
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use arbor_di_impl::Scope;
//! use arbor_di_macros::{Constructible, Injectable};
//! use std::sync::Arc;
//!
//! #[derive(Default, Injectable, Constructible)]
//! #[constructible(inject, provides = "dyn Handler")]
//! pub struct RequestHandler {
//!     #[dependency]
//!     logger: Option<Arc<dyn Logger>>,
//!     #[dependency(optional)]
//!     metrics: Option<Arc<dyn Metrics>>,
//! }
//!
//! let root = Scope::new();
//! root.register_singleton::<dyn Logger>(Arc::new(ConsoleLogger));
//! root.register_type::<dyn Handler, RequestHandler>();
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod constructible;
mod injectable;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 可注入类型派生宏
///
/// 为结构体实现 `Injectable`。带 `#[dependency]` 的字段生成字段描述，
/// 字段类型必须是 `Arc<I>` 或 `Option<Arc<I>>`；没有标记的字段不会被注入。
///
/// # 参数
///
/// - `#[dependency]` - 必需依赖
/// - `#[dependency(optional)]` - 可选依赖，未注册时保持原值
/// - `#[injectable(property(name = "..", ty = "..", getter = "..", setter = ".."))]` -
///   通过 setter 注入的属性，可再加 `optional`；没有 setter 的属性会被跳过
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Default, Injectable)]
/// #[injectable(property(name = "clock", ty = "dyn Clock", getter = "clock", setter = "set_clock"))]
/// pub struct Scheduler {
///     #[dependency]
///     logger: Option<Arc<dyn Logger>>,
///     clock: Option<Arc<dyn Clock>>,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(dependency, injectable))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::expand_injectable(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 可构造类型派生宏
///
/// 为结构体实现 `Constructible`，使其可以用 `register_type` 按类型注册。
///
/// # 参数
///
/// - `default` - 用 `Default::default()` 创建（默认）
/// - `new` - 用 `Self::new()` 创建
/// - `with_scope = "fn"` - 调用 `Self::fn(&Scope) -> DependencyResult<Self>`
/// - `inject` - 创建后调用 `scope.resolve_dependencies`
/// - `provides = "dyn Trait"` - 实现 `Provides<dyn Trait>`，可重复
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Constructible)]
/// #[constructible(new, provides = "dyn Clock")]
/// pub struct SystemClock;
/// ```
#[proc_macro_derive(Constructible, attributes(constructible))]
pub fn derive_constructible(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    constructible::expand_constructible(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
