use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use rmcp::schemars;
use serde_json::{json, Value};
use std::sync::Arc;

use super::schemas::get_metadata::GetMetadataRequest;
use super::schemas::recent_files::RecentFilesRequest;
use super::schemas::search::SearchRequest;
use super::schemas::search_by_kind::SearchByKindRequest;

#[derive(Clone, Copy, Debug)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub summary: &'static str,
}

pub const TOOL_CATALOG: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "search",
        summary: "Find files under a directory whose content contains the given text.",
    },
    ToolDescriptor {
        name: "search_by_kind",
        summary: "Find files of a kind (document, image, video, audio, pdf, code) under a directory.",
    },
    ToolDescriptor {
        name: "recent_files",
        summary: "Find files under a directory modified since a date (default: last 7 days).",
    },
    ToolDescriptor {
        name: "get_metadata",
        summary: "Return every metadata attribute of one file.",
    },
];

fn input_schema<T: schemars::JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(object)) => Arc::new(object),
        _ => Arc::new(JsonObject::new()),
    }
}

fn schema_for(name: &str) -> Arc<JsonObject> {
    match name {
        "search" => input_schema::<SearchRequest>(),
        "search_by_kind" => input_schema::<SearchByKindRequest>(),
        "recent_files" => input_schema::<RecentFilesRequest>(),
        "get_metadata" => input_schema::<GetMetadataRequest>(),
        _ => Arc::new(JsonObject::new()),
    }
}

/// Descriptors for `tools/list`, in catalog order
pub fn list_tools() -> Vec<Tool> {
    TOOL_CATALOG
        .iter()
        .map(|descriptor| {
            let mut tool = Tool::new(
                descriptor.name,
                format!(
                    "{} Results are JSON; search tools return an array of attribute objects with `_path`.",
                    descriptor.summary
                ),
                schema_for(descriptor.name),
            );
            tool.annotations = Some(
                ToolAnnotations::new()
                    .read_only(true)
                    .destructive(false)
                    .idempotent(true)
                    .open_world(false),
            );
            tool
        })
        .collect()
}

pub fn tool_inventory_json(version: &str) -> Value {
    let tools: Vec<Value> = TOOL_CATALOG
        .iter()
        .map(|tool| json!({ "name": tool.name, "summary": tool.summary }))
        .collect();

    json!({
        "binary": "spotlight-mcp",
        "version": version,
        "count": tools.len(),
        "tools": tools,
    })
}

pub fn tool_instructions() -> String {
    let mut lines = vec![
        "Spotlight MCP searches the local desktop metadata index.".to_string(),
        "Every search needs an absolute `scope` directory; results are JSON attribute objects keyed by kMDItem* names plus `_path`."
            .to_string(),
        "Tools:".to_string(),
    ];
    for tool in TOOL_CATALOG {
        lines.push(format!("- {}: {}", tool.name, tool.summary));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tool_has_object_schema_with_required_fields() {
        let tools = list_tools();
        assert_eq!(tools.len(), 4);
        for tool in &tools {
            let schema = tool.input_schema.as_ref();
            assert_eq!(schema.get("type"), Some(&json!("object")), "{}", tool.name);
            let required: Vec<&str> = schema
                .get("required")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let expected: &[&str] = match &*tool.name {
                "search" => &["query", "scope"],
                "search_by_kind" => &["kind", "scope"],
                "recent_files" => &["scope"],
                "get_metadata" => &["path"],
                other => panic!("unexpected tool {other}"),
            };
            for field in expected {
                assert!(required.contains(field), "{} should require {field}", tool.name);
            }
        }
    }

    #[test]
    fn tools_are_read_only() {
        for tool in list_tools() {
            let annotations = tool.annotations.expect("annotations");
            assert_eq!(annotations.read_only_hint, Some(true));
        }
    }

    #[test]
    fn inventory_lists_catalog() {
        let inventory = tool_inventory_json("0.0.0");
        assert_eq!(inventory["count"], json!(4));
        assert_eq!(inventory["tools"][0]["name"], json!("search"));
    }
}
