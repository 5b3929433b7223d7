//! Wire rows as returned by the indexing service.

use serde_json::{Value, json};

use crate::types::{Address, Instant};

fn hex(address: Address) -> String { format!("{address:#x}") }

fn id_ref(id: impl Into<String>) -> Value { json!({ "id": id.into() }) }

pub fn account(address: Address, created_at: Instant) -> Value {
    json!({
        "id": hex(address),
        "createdAtBlockNumber": created_at.block_number().to_string(),
        "createdAtTimestamp": created_at.timestamp().to_string(),
        "updatedAtBlockNumber": created_at.block_number().to_string(),
        "updatedAtTimestamp": created_at.timestamp().to_string(),
        "isSuperApp": false,
    })
}

pub fn token(address: Address, symbol: &str, decimals: u8) -> Value {
    json!({
        "id": hex(address),
        "createdAtBlockNumber": "1",
        "createdAtTimestamp": "1600000000",
        "decimals": decimals,
        "name": format!("Super {symbol}"),
        "symbol": symbol,
        "isSuperToken": true,
        "isListed": true,
        "underlyingAddress": hex(Address::ZERO),
    })
}

pub fn stream(id: &str, token: Address, sender: Address, receiver: Address, flow_rate: &str) -> Value {
    json!({
        "id": id,
        "createdAtBlockNumber": "100",
        "createdAtTimestamp": "1650000000",
        "updatedAtBlockNumber": "100",
        "updatedAtTimestamp": "1650000000",
        "currentFlowRate": flow_rate,
        "streamedUntilUpdatedAt": "0",
        "token": id_ref(hex(token)),
        "sender": id_ref(hex(sender)),
        "receiver": id_ref(hex(receiver)),
    })
}

/// Active period of `stream`, started at the given instant.
pub fn stream_period(
    id: &str,
    stream: &str,
    token: Address,
    sender: Address,
    receiver: Address,
    started_at: Instant,
) -> Value {
    json!({
        "id": id,
        "flowRate": "385802469135802",
        "startedAtBlockNumber": started_at.block_number().to_string(),
        "startedAtTimestamp": started_at.timestamp().to_string(),
        "stoppedAtBlockNumber": null,
        "stoppedAtTimestamp": null,
        "totalAmountStreamed": null,
        "token": id_ref(hex(token)),
        "stream": id_ref(stream),
        "sender": id_ref(hex(sender)),
        "receiver": id_ref(hex(receiver)),
        "startedAtEvent": id_ref(format!("FlowUpdated-{id}")),
        "stoppedAtEvent": null,
    })
}

/// Stops the period at the given instant having streamed `total` in total.
pub fn stopped(mut period: Value, stopped_at: Instant, total: &str) -> Value {
    let id = period["id"].as_str().unwrap_or_default().to_string();
    period["stoppedAtBlockNumber"] = json!(stopped_at.block_number().to_string());
    period["stoppedAtTimestamp"] = json!(stopped_at.timestamp().to_string());
    period["totalAmountStreamed"] = json!(total);
    period["stoppedAtEvent"] = id_ref(format!("FlowUpdated-{id}-stop"));
    period
}
