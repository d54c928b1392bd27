//! YAML front matter splitting.

use serde_json::{Map, Value};

/// Front matter fields and the remaining document body.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document<'a> {
    pub fields: Map<String, Value>,
    pub body: &'a str,
}

/// Split a leading `---` delimited YAML block from `input`.
///
/// The opening line may carry a BOM; the block closes with `---` or `...`.
/// Input without an opening delimiter, or with no closing one, is all body.
/// Errors are YAML messages or a note that the block is not a mapping.
pub fn split_front_matter(input: &str) -> Result<Document<'_>, String> {
    let mut lines = input.split_inclusive('\n');
    let not_found = Document {
        fields: Map::new(),
        body: input,
    };

    let Some(first) = lines.next() else {
        return Ok(not_found);
    };
    if first.trim_start_matches('\u{feff}').trim_end() != "---" {
        return Ok(not_found);
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &input[yaml_start..offset];
            let body = &input[offset + line.len()..];
            return Ok(Document {
                fields: parse_mapping(yaml)?,
                body,
            });
        }
        offset += line.len();
    }

    Ok(not_found)
}

/// Parse YAML into a JSON object; an empty block gives an empty object.
fn parse_mapping(yaml: &str) -> Result<Map<String, Value>, String> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    match serde_json::to_value(value).map_err(|e| e.to_string())? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(format!("expected a mapping, found {other}")),
    }
}
