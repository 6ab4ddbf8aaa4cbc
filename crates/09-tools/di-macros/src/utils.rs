//! 宏工具函数

use syn::{GenericArgument, PathArguments, Type};

/// 可注入字段的存放方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSlot {
    /// `Arc<I>`，直接覆盖
    Direct,
    /// `Option<Arc<I>>`，写入 `Some`
    Optional,
}

/// 获取类型路径最后一段的名称
fn last_segment_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if let PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(GenericArgument::Type(inner_type)) = args.args.first() {
                    return Some(inner_type);
                }
            }
        }
    }
    None
}

/// 检查类型是否为 Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    last_segment_ident(ty).as_deref() == Some("Option")
}

/// 检查类型是否为 Arc<T>
pub fn is_arc_type(ty: &Type) -> bool {
    last_segment_ident(ty).as_deref() == Some("Arc")
}

/// 解析字段类型，得到存放方式和服务类型
///
/// 支持 `Arc<I>` 和 `Option<Arc<I>>`。
pub fn service_slot(ty: &Type) -> Option<(FieldSlot, &Type)> {
    if is_option_type(ty) {
        let inner = extract_generic_type(ty)?;
        if is_arc_type(inner) {
            return extract_generic_type(inner).map(|service| (FieldSlot::Optional, service));
        }
        return None;
    }
    if is_arc_type(ty) {
        return extract_generic_type(ty).map(|service| (FieldSlot::Direct, service));
    }
    None
}
