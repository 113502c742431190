//! Typed tool-call payloads.
//!
//! Tool executors hand the engine raw JSON. Known tool shapes are lifted into
//! [`ToolArgs`] variants so the session can reason about them (e.g. which file
//! a write touched); anything else is kept verbatim in [`ToolArgs::Other`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments of a tool invocation.
///
/// Members a typed shape does not declare are kept in its `extra` map, so a
/// parsed payload never loses executor arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolArgs {
    WriteFile {
        path: String,
        #[serde(default)]
        content: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    EditFile {
        path: String,
        #[serde(default)]
        old_text: String,
        #[serde(default)]
        new_text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ReadFile {
        path: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ListDirectory {
        path: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    RunCommand {
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cwd: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Search {
        query: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Unknown tool, or a known tool whose arguments did not match its shape.
    Other { value: Value },
}

impl ToolArgs {
    /// Lifts raw executor arguments into a typed shape based on the tool name.
    pub fn parse(tool_name: &str, raw: Value) -> Self {
        let Some(kind) = known_kind(tool_name) else {
            return Self::Other { value: raw };
        };
        let Value::Object(mut map) = raw.clone() else {
            return Self::Other { value: raw };
        };
        map.insert("kind".to_string(), Value::String(kind.to_string()));
        serde_json::from_value(Value::Object(map)).unwrap_or(Self::Other { value: raw })
    }

    /// The file path this call writes to, if it is a file-write operation.
    pub fn written_path(&self) -> Option<&str> {
        match self {
            Self::WriteFile { path, .. } | Self::EditFile { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Compact one-line rendering for summaries.
    pub fn describe(&self) -> String {
        match self {
            Self::WriteFile { path, .. } | Self::EditFile { path, .. } => path.clone(),
            Self::ReadFile { path, .. } | Self::ListDirectory { path, .. } => path.clone(),
            Self::RunCommand { command, .. } => command.clone(),
            Self::Search { query, .. } => query.clone(),
            Self::Other { value } => value.to_string(),
        }
    }
}

fn known_kind(tool_name: &str) -> Option<&'static str> {
    match tool_name {
        "write_file" | "create_file" => Some("write_file"),
        "edit_file" | "replace_in_file" | "apply_edit" => Some("edit_file"),
        "read_file" => Some("read_file"),
        "list_directory" | "list_files" => Some("list_directory"),
        "run_command" | "execute_command" | "shell" => Some("run_command"),
        "search" | "search_files" | "grep" => Some("search"),
        _ => None,
    }
}

/// Outcome reported by a tool executor.
///
/// A call is successful when it carries no `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(output: Value) -> Self {
        Self {
            output,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Splits a raw executor result into output and error.
    ///
    /// An object with a non-null `error` member is a failure; the remaining
    /// members become the output.
    pub fn from_raw(raw: Value) -> Self {
        match raw {
            Value::Object(mut map) => match map.remove("error") {
                Some(Value::Null) | None => Self::ok(Value::Object(map)),
                Some(Value::String(message)) => Self {
                    output: non_empty(map),
                    error: Some(message),
                },
                Some(other) => Self {
                    output: non_empty(map),
                    error: Some(other.to_string()),
                },
            },
            other => Self::ok(other),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Text used for previews: the error when failed, otherwise the output.
    pub fn preview_text(&self) -> String {
        if let Some(error) = &self.error {
            return format!("error: {}", error);
        }
        match &self.output {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

fn non_empty(map: serde_json::Map<String, Value>) -> Value {
    if map.is_empty() {
        Value::Null
    } else {
        Value::Object(map)
    }
}

/// A tool call made during a conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub args: ToolArgs,
    pub result: ToolResult,
    pub success: bool,
}

impl ToolInvocation {
    pub fn new(tool: impl Into<String>, args: ToolArgs, result: ToolResult) -> Self {
        let success = result.is_success();
        Self {
            tool: tool.into(),
            args,
            result,
            success,
        }
    }
}
