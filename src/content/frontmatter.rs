//! Front-matter parsing

use serde_yaml::{Mapping, Value};

/// Split a document into its YAML front-matter fields and the body.
///
/// A document without a `---` fenced header has no fields. The header must
/// be a YAML mapping; anything else is an error.
pub fn parse(content: &str) -> Result<(Mapping, &str), String> {
    let content = content.trim_start_matches('\u{feff}');
    let trimmed = content.trim_start();

    let Some(rest) = trimmed.strip_prefix("---") else {
        return Ok((Mapping::new(), content));
    };
    // `----` or `--- text` is a thematic break, not a fence
    let Some(rest) = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
    else {
        return Ok((Mapping::new(), content));
    };

    let (yaml, body) = match find_closing_fence(rest) {
        Some((end, body_start)) => (&rest[..end], &rest[body_start..]),
        None => return Err("unterminated front-matter, missing closing ---".to_string()),
    };
    let body = body.trim_start_matches(['\n', '\r']);

    if yaml.trim().is_empty() {
        return Ok((Mapping::new(), body));
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(fields)) => Ok((fields, body)),
        Ok(Value::Null) => Ok((Mapping::new(), body)),
        Ok(_) => Err("front-matter is not a mapping".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Offsets of the closing fence line and of the body after it
fn find_closing_fence(rest: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

/// Render front-matter fields and a body back into document text
pub fn compose(fields: &Mapping, body: &str) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(fields)?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}
