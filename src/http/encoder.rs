//! Builds request bodies from [`Command`]s.
//!
//! A body is a single JSON object: the `command` key first, followed by the
//! command's parameters in the order the registry declares them.

use serde_json::{Map, Value};

use super::command::Command;

/// Key carrying the command's wire name.
pub const COMMAND_KEY: &str = "command";

/// Returns the request body for `command` as a JSON object.
pub fn request_object(command: &Command) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert(COMMAND_KEY.to_string(), Value::String(command.name().to_string()));
    for (key, parameter) in command.parameters() {
        object.insert(key.to_string(), parameter.to_value());
    }
    object
}

/// Serializes the request body for `command` to UTF-8 JSON bytes.
pub fn encode_request(command: &Command) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&request_object(command))
}
