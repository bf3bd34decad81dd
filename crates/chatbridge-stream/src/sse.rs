//! Wire framing for translated events.

use chatbridge_core::events::ResponseStreamEvent;

/// Frame `event` as a server-sent event: `event: <type>\ndata: <json>\n\n`.
pub fn encode_sse(event: &ResponseStreamEvent) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(event)?;
    Ok(format!("event: {}\ndata: {json}\n\n", event.event_type()))
}

/// Frame `event` as one newline-terminated JSON line.
pub fn encode_ndjson(event: &ResponseStreamEvent) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    Ok(line)
}
