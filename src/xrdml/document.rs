//! # XML 文档查询辅助
//!
//! 在 `roxmltree` 只读 DOM 之上提供解码器需要的最小查询能力：
//! 按名字找第一个/全部子元素、按路径下钻、读文本、解析数值列表。
//! 元素匹配只看局部名，命名空间归属由 `schema` 模块在入口处校验。
//!
//! ## 依赖关系
//! - 被 `xrdml/` 各子模块使用
//! - 使用 `roxmltree` crate

use roxmltree::Node;

/// 第一个局部名为 `name` 的子元素
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// 所有局部名为 `name` 的子元素
pub fn find_children<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().name() == name)
        .collect()
}

/// 沿局部名路径逐级下钻，任一级缺失返回 None
pub fn find_path<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    let mut current = node;
    for name in path {
        current = find_child(current, name)?;
    }
    Some(current)
}

/// 子元素的文本内容
pub fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    find_child(node, name).and_then(|n| n.text())
}

/// 路径终点元素的文本内容
pub fn path_text<'a>(node: Node<'a, '_>, path: &[&str]) -> Option<&'a str> {
    find_path(node, path).and_then(|n| n.text())
}

/// 把空白分隔的数值列表解析为 f64 数组
///
/// 无法解析的片段被跳过，None 输入给出空数组。
pub fn parse_float_list(txt: Option<&str>) -> Vec<f64> {
    match txt {
        Some(txt) => txt
            .split_whitespace()
            .filter_map(|s| s.parse::<f64>().ok())
            .collect(),
        None => Vec::new(),
    }
}

/// 解析单个浮点数文本
pub fn parse_double(txt: Option<&str>) -> Option<f64> {
    txt.and_then(|s| s.trim().parse::<f64>().ok())
}
