//! Line-oriented interaction input.
//!
//! Each non-blank line is one JSON [`InteractionEvent`], for example
//! `{"actor":"goblin","amount":12}` or `{"actor":"cleric","beneficial":true}`.
//! Lines starting with `#` are comments.

use agent_runtime::InteractionEvent;
use anyhow::{Context, Result};

/// Parse one input line; `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<InteractionEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let event = serde_json::from_str(line)
        .with_context(|| format!("Malformed interaction: {line}"))?;
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# warm-up").unwrap().is_none());
    }

    #[test]
    fn parses_interactions() {
        let event = parse_line(r#" {"actor":"goblin","amount":12} "#).unwrap();
        assert_eq!(event, Some(InteractionEvent::harmful("goblin", 12)));
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(parse_line("goblin hits you").is_err());
        assert!(parse_line(r#"{"amount":3}"#).is_err());
    }
}
