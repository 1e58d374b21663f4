use serde::Serialize;

use resmap_client::{ForestViolation, Tag, TreeNode};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowJson<'a> {
    pub id: &'a str,
    pub value: &'a str,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub path: String,
}

impl<'a> RowJson<'a> {
    pub fn from_node(node: &TreeNode<'a>) -> Self {
        Self {
            id: node.tag.id.as_str(),
            value: &node.tag.value,
            depth: node.depth,
            has_children: node.has_children(),
            expanded: node.is_expanded,
            path: node.tag.display_path(),
        }
    }
}

#[derive(Serialize)]
pub struct CheckJson<'a> {
    pub tag_count: usize,
    pub fatal: usize,
    pub violations: &'a [ForestViolation],
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One line per visible row, indented by depth. `-` marks an expanded
/// parent, `+` a collapsed one.
pub fn render_rows(rows: &[&TreeNode<'_>]) -> String {
    let mut out = String::new();
    for node in rows {
        let marker = match (node.has_children(), node.is_expanded) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        };
        out.push_str(&"  ".repeat(node.depth));
        out.push(marker);
        out.push(' ');
        out.push_str(&node.tag.value);
        out.push_str("  [");
        out.push_str(node.tag.id.as_str());
        out.push_str("]\n");
    }
    out
}

pub fn render_tag(tag: &Tag) -> String {
    let mut line = format!("{}  [{}]", tag.display_path(), tag.id);
    if let Some(location) = &tag.location_metadata {
        line.push_str(&format!("  ({})", location.kind().to_lowercase()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use resmap_client::{flatten, ExpandState, LocationMetadata, TagType};

    fn tags() -> Vec<Tag> {
        vec![
            Tag::new("hq", "HQ", TagType::Location),
            Tag::new("b1", "Building 1", TagType::Location)
                .with_parent("hq")
                .with_path(vec!["HQ".into(), "Building 1".into()]),
            Tag::new("yard", "Yard", TagType::Location),
        ]
    }

    #[test]
    fn test_render_rows_indents_and_marks() {
        let tags = tags();
        let tree = ExpandState::all_expanded(&tags).build(&tags);
        let text = render_rows(&flatten(&tree));
        assert_eq!(text, "- HQ  [hq]\n    Building 1  [b1]\n  Yard  [yard]\n");
    }

    #[test]
    fn test_render_rows_collapsed_parent() {
        let tags = tags();
        let tree = ExpandState::new().build(&tags);
        let text = render_rows(&flatten(&tree));
        assert_eq!(text, "+ HQ  [hq]\n  Yard  [yard]\n");
    }

    #[test]
    fn test_render_tag_with_location() {
        let tag = Tag::new("d", "Dock", TagType::Location).with_location(
            LocationMetadata::PlusCode {
                code: "862M+2X".into(),
            },
        );
        assert_eq!(render_tag(&tag), "Dock  [d]  (plus_code)");
    }

    #[test]
    fn test_row_json_field_names() {
        let tags = tags();
        let tree = ExpandState::all_expanded(&tags).build(&tags);
        let rows = flatten(&tree);
        let value = serde_json::to_value(RowJson::from_node(rows[1])).unwrap();
        assert_eq!(value["hasChildren"], false);
        assert_eq!(value["path"], "HQ / Building 1");
        assert_eq!(value["depth"], 1);
    }
}
