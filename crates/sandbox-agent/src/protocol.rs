//! Stream-JSON protocol spoken by the agent CLI.
//!
//! Every line on the agent's stdout is one JSON object with a `type` field:
//!
//! ```json
//! {"type": "system", "subtype": "init", "session_id": "…"}
//! {"type": "assistant", "message": {"content": [{"type": "text", "text": "Hi"}]}}
//! {"type": "assistant", "message": {"content": [{"type": "tool_use", "name": "Bash", "input": {}}]}}
//! {"type": "result", "subtype": "success", "is_error": false, "result": "…"}
//! ```
//!
//! Prompts travel the other way as `user` messages.

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::event::{AgentEvent, Completion};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when parsing protocol messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Missing or invalid 'type' field")]
    MissingType,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

// ============================================================================
// Parsing
// ============================================================================

/// Raw JSON envelope for parsing.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    // Assistant fields
    message: Option<Value>,
    // Result fields
    subtype: Option<String>,
    #[serde(default)]
    is_error: bool,
    result: Option<Value>,
    session_id: Option<String>,
}

/// Parse a single line of agent output into zero or more events.
///
/// An assistant message yields one event per recognised content block.
/// Message types that carry nothing for the caller (system notices, echoed
/// tool results) yield no events.
pub fn parse_line(line: &str) -> Result<Vec<AgentEvent>, ProtocolError> {
    let envelope: RawEnvelope = serde_json::from_str(line)?;

    let kind = envelope.kind.ok_or(ProtocolError::MissingType)?;

    match kind.as_str() {
        "assistant" => {
            let message = envelope
                .message
                .ok_or(ProtocolError::MissingField("message"))?;
            let blocks = message
                .get("content")
                .and_then(Value::as_array)
                .ok_or(ProtocolError::MissingField("message.content"))?;

            let mut events = Vec::with_capacity(blocks.len());
            for block in blocks {
                if let Some(event) = parse_block(block)? {
                    events.push(event);
                }
            }
            Ok(events)
        }

        "result" => {
            let subtype = envelope
                .subtype
                .ok_or(ProtocolError::MissingField("subtype"))?;

            // Only text results are kept; structured ones stay on the wire.
            let result = envelope
                .result
                .as_ref()
                .and_then(Value::as_str)
                .map(ToString::to_string);

            Ok(vec![AgentEvent::Completion(Completion {
                subtype,
                is_error: envelope.is_error,
                result,
                session_id: envelope.session_id,
            })])
        }

        _ => Ok(Vec::new()),
    }
}

fn parse_block(block: &Value) -> Result<Option<AgentEvent>, ProtocolError> {
    match block.get("type").and_then(Value::as_str) {
        Some("text") => {
            let text = block
                .get("text")
                .and_then(Value::as_str)
                .ok_or(ProtocolError::MissingField("text"))?;
            Ok(Some(AgentEvent::TextDelta(text.to_string())))
        }
        Some("tool_use") => {
            let name = block
                .get("name")
                .and_then(Value::as_str)
                .ok_or(ProtocolError::MissingField("name"))?;
            let input = block.get("input").cloned().unwrap_or(Value::Null);
            Ok(Some(AgentEvent::ToolInvocation {
                name: name.to_string(),
                input,
            }))
        }
        // thinking blocks and anything newer
        _ => Ok(None),
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a prompt as a single protocol line (without the trailing newline).
pub fn encode_prompt(prompt: &str) -> String {
    json!({
        "type": "user",
        "message": {
            "role": "user",
            "content": prompt,
        },
    })
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Assistant messages
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_text_block() {
        let line = r#"{"type": "assistant", "message": {"content": [{"type": "text", "text": "Hello"}]}}"#;
        let events = parse_line(line).unwrap();

        assert_eq!(events, vec![AgentEvent::TextDelta("Hello".to_string())]);
    }

    #[test]
    fn test_parse_mixed_blocks_keep_order() {
        let line = r#"{"type": "assistant", "message": {"content": [
            {"type": "text", "text": "Listing files"},
            {"type": "tool_use", "id": "t1", "name": "Bash", "input": {"command": "ls"}},
            {"type": "thinking", "thinking": "hmm"},
            {"type": "text", "text": "done"}
        ]}}"#;
        let events = parse_line(line).unwrap();

        assert_eq!(
            events,
            vec![
                AgentEvent::TextDelta("Listing files".to_string()),
                AgentEvent::ToolInvocation {
                    name: "Bash".to_string(),
                    input: json!({"command": "ls"}),
                },
                AgentEvent::TextDelta("done".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_tool_use_without_input() {
        let line =
            r#"{"type": "assistant", "message": {"content": [{"type": "tool_use", "name": "Glob"}]}}"#;
        let events = parse_line(line).unwrap();

        assert_eq!(
            events,
            vec![AgentEvent::ToolInvocation {
                name: "Glob".to_string(),
                input: Value::Null,
            }]
        );
    }

    #[test]
    fn test_parse_assistant_missing_message() {
        let err = parse_line(r#"{"type": "assistant"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("message")));
    }

    #[test]
    fn test_parse_assistant_missing_content() {
        let err = parse_line(r#"{"type": "assistant", "message": {"role": "assistant"}}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("message.content")));
    }

    #[test]
    fn test_parse_text_block_missing_text() {
        let line = r#"{"type": "assistant", "message": {"content": [{"type": "text"}]}}"#;
        let err = parse_line(line).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("text")));
    }

    // ------------------------------------------------------------------------
    // Result messages
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_result() {
        let line = r#"{"type": "result", "subtype": "success", "is_error": false, "result": "All set", "session_id": "abc", "num_turns": 3}"#;
        let events = parse_line(line).unwrap();

        assert_eq!(
            events,
            vec![AgentEvent::Completion(Completion {
                subtype: "success".to_string(),
                is_error: false,
                result: Some("All set".to_string()),
                session_id: Some("abc".to_string()),
            })]
        );
    }

    #[test]
    fn test_parse_error_result_without_text() {
        let line = r#"{"type": "result", "subtype": "error_during_execution", "is_error": true}"#;
        let events = parse_line(line).unwrap();

        let AgentEvent::Completion(completion) = &events[0] else {
            panic!("expected completion, got {events:?}");
        };
        assert!(completion.is_error);
        assert_eq!(completion.result, None);
    }

    #[test]
    fn test_parse_result_missing_subtype() {
        let err = parse_line(r#"{"type": "result", "is_error": false}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("subtype")));
    }

    // ------------------------------------------------------------------------
    // Ignored and invalid lines
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_system_and_user_ignored() {
        let system = r#"{"type": "system", "subtype": "init", "session_id": "abc", "tools": []}"#;
        let user = r#"{"type": "user", "message": {"content": [{"type": "tool_result", "content": "ok"}]}}"#;

        assert!(parse_line(system).unwrap().is_empty());
        assert!(parse_line(user).unwrap().is_empty());
    }

    #[test]
    fn test_parse_missing_type() {
        let err = parse_line(r#"{"subtype": "success"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingType));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_line("Loading configuration...").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    #[test]
    fn test_encode_prompt() {
        let line = encode_prompt("build a \"hello\" server");
        let value: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "user",
                "message": {"role": "user", "content": "build a \"hello\" server"}
            })
        );
        assert!(!line.contains('\n'));
    }
}
