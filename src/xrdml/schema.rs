//! # XRDML schema 版本检测
//!
//! 厂商 schema 是一个按版本演进的家族，文档通过命名空间 URI 声明
//! 自己属于哪一版。检测从最新版本开始逐个尝试，接受第一个匹配的
//! 版本；没有任何版本匹配时由解码器上报 `MalformedDocument`，并
//! 附带尝试过的版本列表。
//!
//! ## 依赖关系
//! - 被 `xrdml/decoder.rs` 调用
//! - 使用 `roxmltree` crate

use roxmltree::Document;

/// 已知的 schema 版本及其命名空间，新版本在前
pub const SCHEMA_VERSIONS: [(&str, &str); 6] = [
    ("1.5", "http://www.xrdml.com/XRDMeasurement/1.5"),
    ("1.4", "http://www.xrdml.com/XRDMeasurement/1.4"),
    ("1.3", "http://www.xrdml.com/XRDMeasurement/1.3"),
    ("1.2", "http://www.xrdml.com/XRDMeasurement/1.2"),
    ("1.1", "http://www.xrdml.com/XRDMeasurement/1.1"),
    ("1.0", "http://www.xrdml.com/XRDMeasurement/1.0"),
];

/// 根元素的局部名
pub const ROOT_ELEMENT: &str = "xrdMeasurements";

/// 检测文档匹配的 schema 版本号
///
/// 根元素名或命名空间不匹配任何已知版本时返回 None。
pub fn detect_version(doc: &Document) -> Option<&'static str> {
    let root = doc.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return None;
    }
    let ns = root.tag_name().namespace()?;
    SCHEMA_VERSIONS
        .iter()
        .find(|(_, candidate)| *candidate == ns)
        .map(|(version, _)| *version)
}

/// 尝试过的版本列表，用于错误信息
pub fn attempted_versions() -> String {
    SCHEMA_VERSIONS
        .iter()
        .map(|(v, _)| *v)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_version_matches_newest_family_member() {
        let xml = r#"<xrdMeasurements xmlns="http://www.xrdml.com/XRDMeasurement/1.5"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(detect_version(&doc), Some("1.5"));

        let xml = r#"<xrdMeasurements xmlns="http://www.xrdml.com/XRDMeasurement/1.0"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(detect_version(&doc), Some("1.0"));
    }

    #[test]
    fn test_detect_version_rejects_unknown() {
        let xml = r#"<xrdMeasurements xmlns="http://www.xrdml.com/XRDMeasurement/9.9"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(detect_version(&doc), None);

        // 根元素名不对
        let xml = r#"<measurements xmlns="http://www.xrdml.com/XRDMeasurement/1.5"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(detect_version(&doc), None);

        // 无命名空间
        let doc = Document::parse("<xrdMeasurements/>").unwrap();
        assert_eq!(detect_version(&doc), None);
    }

    #[test]
    fn test_attempted_versions_newest_first() {
        let listed = attempted_versions();
        assert!(listed.starts_with("1.5"));
        assert!(listed.ends_with("1.0"));
    }
}
