//! Realtime Channel Frames
//!
//! Text frames of the store's Phoenix-channel change feed, and the channel
//! bookkeeping of one socket. The socket itself belongs to the platform
//! layer: it only moves the frames this module hands it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::traits::{ChangeFilter, ChangeKind};
use crate::domain::{DomainError, DomainResult};

/// Interval at which the client must send heartbeats
pub const HEARTBEAT_INTERVAL_MS: u32 = 30_000;

const PHOENIX_TOPIC: &str = "phoenix";
const SCHEMA: &str = "public";

/// One frame on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl Frame {
    pub fn encode(&self) -> String {
        // A Frame is plain JSON data and always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// What an incoming frame means to us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A matching row was inserted or deleted
    Change { topic: String, kind: ChangeKind },
    /// Answer to a join/leave/heartbeat
    Reply { topic: String, ok: bool, detail: String },
    /// Server-side channel error or close
    ChannelClosed { topic: String, reason: String },
    /// Anything else (presence, system notices, unrelated events)
    Ignored,
}

/// Topic under which a filter is joined
pub fn topic_for(filter: &ChangeFilter) -> String {
    format!("realtime:{}", filter.channel_name())
}

/// `phx_join` subscribing `topic` to INSERT and DELETE rows matching `filter`
pub fn join_frame(topic: &str, filter: &ChangeFilter, access_token: &str, reference: u64) -> Frame {
    let changes: Vec<Value> = [ChangeKind::Insert, ChangeKind::Delete]
        .iter()
        .map(|kind| {
            let mut change = json!({
                "event": kind.as_str(),
                "schema": SCHEMA,
                "table": filter.table,
            });
            if let Some(row_filter) = filter.row_filter() {
                change["filter"] = Value::String(row_filter);
            }
            change
        })
        .collect();

    Frame {
        topic: topic.to_string(),
        event: "phx_join".to_string(),
        payload: json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": changes,
            },
            "access_token": access_token,
        }),
        reference: Some(reference.to_string()),
    }
}

pub fn leave_frame(topic: &str, reference: u64) -> Frame {
    Frame {
        topic: topic.to_string(),
        event: "phx_leave".to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

pub fn heartbeat_frame(reference: u64) -> Frame {
    Frame {
        topic: PHOENIX_TOPIC.to_string(),
        event: "heartbeat".to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

/// Classify a received text frame
pub fn decode(text: &str) -> DomainResult<Incoming> {
    let frame: Frame = serde_json::from_str(text).map_err(|e| DomainError::Decode(e.to_string()))?;

    let incoming = match frame.event.as_str() {
        "postgres_changes" => {
            let kind = frame
                .payload
                .pointer("/data/type")
                .and_then(Value::as_str)
                .and_then(ChangeKind::from_str);
            match kind {
                Some(kind) => Incoming::Change { topic: frame.topic, kind },
                None => Incoming::Ignored,
            }
        }
        // Older servers name the event after the change itself
        "INSERT" | "DELETE" => match ChangeKind::from_str(&frame.event) {
            Some(kind) => Incoming::Change { topic: frame.topic, kind },
            None => Incoming::Ignored,
        },
        "phx_reply" => {
            let ok = frame.payload.get("status").and_then(Value::as_str) == Some("ok");
            let detail = frame
                .payload
                .pointer("/response/reason")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Incoming::Reply { topic: frame.topic, ok, detail }
        }
        "phx_error" | "phx_close" => Incoming::ChannelClosed {
            topic: frame.topic,
            reason: frame.event,
        },
        _ => Incoming::Ignored,
    };
    Ok(incoming)
}

/// Listener slot within a channel
pub type ListenerId = u64;

struct Channel<L> {
    filter: ChangeFilter,
    listeners: Vec<(ListenerId, L)>,
}

/// Result of adding a listener
#[derive(Debug)]
pub struct Registered {
    pub topic: String,
    pub id: ListenerId,
    /// Join frame to write now, when this opened the channel on a live socket
    pub outgoing: Option<Frame>,
}

/// Channels of one realtime socket.
///
/// One channel per distinct topic, shared by every listener with that
/// filter. The first listener joins it, the last one leaves it. While the
/// socket is not open, frames wait in an outbox that is flushed on open
/// and discarded on reconnect.
pub struct ChannelRegistry<L> {
    access_token: String,
    channels: HashMap<String, Channel<L>>,
    outbox: Vec<Frame>,
    open: bool,
    next_ref: u64,
    next_listener: ListenerId,
}

impl<L: Clone> ChannelRegistry<L> {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            channels: HashMap::new(),
            outbox: Vec::new(),
            open: false,
            next_ref: 1,
            next_listener: 1,
        }
    }

    fn next_ref(&mut self) -> u64 {
        let reference = self.next_ref;
        self.next_ref += 1;
        reference
    }

    /// Frame to write now, or `None` once it is queued for the open
    fn route(&mut self, frame: Frame) -> Option<Frame> {
        if self.open {
            Some(frame)
        } else {
            self.outbox.push(frame);
            None
        }
    }

    pub fn add_listener(&mut self, filter: &ChangeFilter, listener: L) -> Registered {
        let topic = topic_for(filter);
        let id = self.next_listener;
        self.next_listener += 1;

        let channel = self
            .channels
            .entry(topic.clone())
            .or_insert_with(|| Channel { filter: filter.clone(), listeners: Vec::new() });
        channel.listeners.push((id, listener));
        let first = channel.listeners.len() == 1;

        let outgoing = if first {
            let reference = self.next_ref();
            let frame = join_frame(&topic, filter, &self.access_token, reference);
            self.route(frame)
        } else {
            None
        };
        Registered { topic, id, outgoing }
    }

    /// Drop a listener. Returns the leave frame to write when it was the
    /// channel's last listener on an open socket.
    pub fn remove_listener(&mut self, topic: &str, id: ListenerId) -> Option<Frame> {
        let channel = self.channels.get_mut(topic)?;
        channel.listeners.retain(|(l, _)| *l != id);
        if !channel.listeners.is_empty() {
            return None;
        }
        self.channels.remove(topic);

        if self.open {
            let reference = self.next_ref();
            Some(leave_frame(topic, reference))
        } else {
            // Never joined on this socket yet
            self.outbox.retain(|frame| frame.topic != topic);
            None
        }
    }

    /// Listeners of `topic`, in subscription order
    pub fn listeners(&self, topic: &str) -> Vec<L> {
        self.channels
            .get(topic)
            .map(|channel| channel.listeners.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Heartbeats are only worth sending on a live socket
    pub fn heartbeat(&mut self) -> Option<Frame> {
        if !self.open {
            return None;
        }
        let reference = self.next_ref();
        Some(heartbeat_frame(reference))
    }

    /// The socket opened; returns the queued frames in order
    pub fn opened(&mut self) -> Vec<Frame> {
        self.open = true;
        std::mem::take(&mut self.outbox)
    }

    pub fn closed(&mut self) {
        self.open = false;
    }

    /// Start over on a fresh socket: anything queued for the old one is
    /// dropped and every channel that still has listeners is joined again.
    /// Returns whether a socket is needed at all.
    pub fn reconnect(&mut self) -> bool {
        self.open = false;
        self.outbox.clear();

        let channels: Vec<(String, ChangeFilter)> = self
            .channels
            .iter()
            .map(|(topic, channel)| (topic.clone(), channel.filter.clone()))
            .collect();
        for (topic, filter) in channels {
            let reference = self.next_ref();
            let frame = join_frame(&topic, &filter, &self.access_token, reference);
            self.outbox.push(frame);
        }
        !self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FridgeId;

    #[test]
    fn test_join_frame_for_one_fridge() {
        let filter = ChangeFilter::fridge(FridgeId::Second);
        let topic = topic_for(&filter);
        assert_eq!(topic, "realtime:fridge_items_2");

        let frame = join_frame(&topic, &filter, "anon", 1);
        assert_eq!(frame.event, "phx_join");
        assert_eq!(frame.reference.as_deref(), Some("1"));

        let changes = frame.payload["config"]["postgres_changes"].as_array().unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0]["event"], "INSERT");
        assert_eq!(changes[1]["event"], "DELETE");
        assert_eq!(changes[0]["table"], "fridge_items");
        assert_eq!(changes[0]["filter"], "fridge_id=eq.2");
    }

    #[test]
    fn test_join_frame_without_filter() {
        let filter = ChangeFilter::all_items();
        let frame = join_frame(&topic_for(&filter), &filter, "anon", 4);
        let changes = frame.payload["config"]["postgres_changes"].as_array().unwrap();
        assert!(changes.iter().all(|c| c.get("filter").is_none()));
    }

    #[test]
    fn test_heartbeat_encoding() {
        let text = heartbeat_frame(9).encode();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["topic"], "phoenix");
        assert_eq!(value["event"], "heartbeat");
        assert_eq!(value["ref"], "9");
    }

    #[test]
    fn test_decode_change_events() {
        let text = r#"{"topic":"realtime:fridge_items_1","event":"postgres_changes","ref":null,
            "payload":{"ids":[1],"data":{"type":"DELETE","schema":"public","table":"fridge_items","old_record":{"id":"x"}}}}"#;
        assert_eq!(
            decode(text).unwrap(),
            Incoming::Change { topic: "realtime:fridge_items_1".to_string(), kind: ChangeKind::Delete }
        );

        let legacy = r#"{"topic":"realtime:fridge_items_all","event":"INSERT","payload":{"type":"INSERT"},"ref":null}"#;
        assert_eq!(
            decode(legacy).unwrap(),
            Incoming::Change { topic: "realtime:fridge_items_all".to_string(), kind: ChangeKind::Insert }
        );
    }

    #[test]
    fn test_decode_replies_and_noise() {
        let ok = r#"{"topic":"realtime:fridge_items_1","event":"phx_reply","payload":{"status":"ok","response":{}},"ref":"1"}"#;
        assert!(matches!(decode(ok).unwrap(), Incoming::Reply { ok: true, .. }));

        let err = r#"{"topic":"realtime:fridge_items_1","event":"phx_reply","payload":{"status":"error","response":{"reason":"unmatched topic"}},"ref":"2"}"#;
        assert_eq!(
            decode(err).unwrap(),
            Incoming::Reply { topic: "realtime:fridge_items_1".to_string(), ok: false, detail: "unmatched topic".to_string() }
        );

        let system = r#"{"topic":"realtime:fridge_items_1","event":"system","payload":{"status":"ok"},"ref":null}"#;
        assert_eq!(decode(system).unwrap(), Incoming::Ignored);

        assert!(decode("not json").is_err());
    }

    fn joined_topics(frames: &[Frame]) -> Vec<String> {
        let mut topics: Vec<String> = frames
            .iter()
            .filter(|f| f.event == "phx_join")
            .map(|f| f.topic.clone())
            .collect();
        topics.sort();
        topics
    }

    fn open_registry() -> ChannelRegistry<&'static str> {
        let mut registry = ChannelRegistry::new("anon");
        assert!(registry.opened().is_empty());
        registry
    }

    #[test]
    fn test_shared_filter_joins_and_leaves_once() {
        let mut registry = open_registry();
        let filter = ChangeFilter::fridge(FridgeId::First);

        let a = registry.add_listener(&filter, "list");
        let b = registry.add_listener(&filter, "alerts");
        assert_eq!(a.topic, b.topic);
        assert_eq!(a.outgoing.map(|f| f.event), Some("phx_join".to_string()));
        assert!(b.outgoing.is_none());
        assert_eq!(registry.listeners(&a.topic), vec!["list", "alerts"]);

        assert!(registry.remove_listener(&a.topic, a.id).is_none());
        let leave = registry.remove_listener(&b.topic, b.id).unwrap();
        assert_eq!(leave.event, "phx_leave");
        assert_eq!(leave.topic, "realtime:fridge_items_1");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_releasing_one_of_two_listeners_keeps_channel() {
        let mut registry = open_registry();
        let filter = ChangeFilter::all_items();

        let first = registry.add_listener(&filter, "first");
        let second = registry.add_listener(&filter, "second");
        assert!(registry.remove_listener(&first.topic, first.id).is_none());
        assert_eq!(registry.listeners(&second.topic), vec!["second"]);

        // Same id twice is harmless
        assert!(registry.remove_listener(&first.topic, first.id).is_none());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_reconnect_rejoins_live_channels_only() {
        let mut registry = open_registry();
        registry.add_listener(&ChangeFilter::fridge(FridgeId::First), "a");
        registry.add_listener(&ChangeFilter::fridge(FridgeId::First), "b");
        let gone = registry.add_listener(&ChangeFilter::fridge(FridgeId::Second), "c");
        registry.add_listener(&ChangeFilter::all_items(), "d");
        registry.remove_listener(&gone.topic, gone.id);

        registry.closed();
        assert!(registry.reconnect());
        let frames = registry.opened();
        assert_eq!(frames.len(), 2);
        assert_eq!(
            joined_topics(&frames),
            vec!["realtime:fridge_items_1".to_string(), "realtime:fridge_items_all".to_string()]
        );
    }

    #[test]
    fn test_frames_queued_before_reconnect_are_dropped() {
        let mut registry = open_registry();
        registry.add_listener(&ChangeFilter::fridge(FridgeId::First), "a");
        registry.closed();

        // Queued for the dead socket
        let late = registry.add_listener(&ChangeFilter::fridge(FridgeId::Shared), "b");
        assert!(late.outgoing.is_none());
        assert!(registry.heartbeat().is_none());

        assert!(registry.reconnect());
        let frames = registry.opened();
        assert_eq!(frames.len(), 2);
        assert_eq!(
            joined_topics(&frames),
            vec!["realtime:fridge_items_1".to_string(), "realtime:fridge_items_3".to_string()]
        );
    }

    #[test]
    fn test_closed_registry_queues_joins_until_open() {
        let mut registry: ChannelRegistry<u32> = ChannelRegistry::new("anon");
        let first = registry.add_listener(&ChangeFilter::fridge(FridgeId::Second), 1);
        assert!(first.outgoing.is_none());
        let dropped = registry.add_listener(&ChangeFilter::fridge(FridgeId::First), 2);
        assert!(registry.remove_listener(&dropped.topic, dropped.id).is_none());

        let frames = registry.opened();
        assert_eq!(joined_topics(&frames), vec!["realtime:fridge_items_2".to_string()]);
        assert_eq!(frames.len(), 1);
        assert!(registry.is_open());
        assert_eq!(registry.heartbeat().map(|f| f.topic), Some("phoenix".to_string()));
    }

    #[test]
    fn test_reconnect_without_listeners_needs_no_socket() {
        let mut registry = open_registry();
        let only = registry.add_listener(&ChangeFilter::all_items(), "x");
        registry.remove_listener(&only.topic, only.id);
        registry.closed();
        assert!(!registry.reconnect());
        assert!(registry.opened().is_empty());
    }
}
