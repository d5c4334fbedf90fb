//! Realtime Change Feed
//!
//! `ChangeFeed` over the store's realtime WebSocket. The page shares one
//! socket; `ChannelRegistry` decides which frames go on it, this module
//! only moves them between the registry and the socket.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use fridge_core::repository::realtime::{self, ChannelRegistry, Frame, Incoming, HEARTBEAT_INTERVAL_MS};
use fridge_core::repository::{ChangeCallback, ChangeFeed, ChangeFilter, ChangeKind, SubscriptionHandle};
use fridge_core::StoreConfig;

const RECONNECT_DELAY_MS: u32 = 5_000;

#[derive(Clone)]
struct Listener {
    on_insert: ChangeCallback,
    on_delete: ChangeCallback,
}

/// Socket plus the JS handlers that must live as long as it does
struct Connection {
    socket: WebSocket,
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _heartbeat: Interval,
}

struct FeedInner {
    url: String,
    connection: RefCell<Option<Connection>>,
    registry: RefCell<ChannelRegistry<Listener>>,
}

#[derive(Clone)]
pub struct RealtimeFeed {
    inner: Rc<FeedInner>,
}

impl RealtimeFeed {
    /// The socket opens lazily with the first subscription
    pub fn new(config: StoreConfig) -> Self {
        Self {
            inner: Rc::new(FeedInner {
                url: config.realtime_url(),
                connection: RefCell::new(None),
                registry: RefCell::new(ChannelRegistry::new(config.key)),
            }),
        }
    }
}

impl FeedInner {
    fn write(&self, frames: impl IntoIterator<Item = Frame>) {
        let connection = self.connection.borrow();
        let Some(conn) = connection.as_ref() else { return };
        for frame in frames {
            if let Err(e) = conn.socket.send_with_str(&frame.encode()) {
                log::warn!("[REALTIME] send of {} failed: {:?}", frame.event, e);
            }
        }
    }

    fn dispatch(&self, text: &str) {
        match realtime::decode(text) {
            Ok(Incoming::Change { topic, kind }) => {
                // Collected first: a callback may subscribe or release
                let listeners = self.registry.borrow().listeners(&topic);
                for listener in listeners {
                    match kind {
                        ChangeKind::Insert => (listener.on_insert)(),
                        ChangeKind::Delete => (listener.on_delete)(),
                    }
                }
            }
            Ok(Incoming::Reply { topic, ok: false, detail }) => {
                log::warn!("[REALTIME] {} refused: {}", topic, detail);
            }
            Ok(Incoming::ChannelClosed { topic, reason }) => {
                log::warn!("[REALTIME] {} closed by server ({})", topic, reason);
            }
            Ok(_) => {}
            Err(e) => log::debug!("[REALTIME] unreadable frame: {}", e),
        }
    }
}

/// Open the socket; queued joins go out once it opens
fn connect(inner: &Rc<FeedInner>) {
    if inner.connection.borrow().is_some() {
        return;
    }

    let socket = match WebSocket::new(&inner.url) {
        Ok(socket) => socket,
        Err(e) => {
            log::error!("[REALTIME] cannot open socket: {:?}", e);
            return;
        }
    };

    let weak = Rc::downgrade(inner);
    let on_open = Closure::<dyn FnMut()>::new(move || {
        if let Some(inner) = weak.upgrade() {
            log::info!("[REALTIME] connected");
            let pending = inner.registry.borrow_mut().opened();
            inner.write(pending);
        }
    });
    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

    let weak = Rc::downgrade(inner);
    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        if let (Some(inner), Some(text)) = (weak.upgrade(), event.data().as_string()) {
            inner.dispatch(&text);
        }
    });
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let weak = Rc::downgrade(inner);
    let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
        log::warn!("[REALTIME] disconnected (code {}): {}", event.code(), event.reason());
        if let Some(inner) = weak.upgrade() {
            inner.registry.borrow_mut().closed();
        }
        schedule_reconnect(weak.clone());
    });
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let weak = Rc::downgrade(inner);
    let heartbeat = Interval::new(HEARTBEAT_INTERVAL_MS, move || {
        if let Some(inner) = weak.upgrade() {
            let frame = inner.registry.borrow_mut().heartbeat();
            inner.write(frame);
        }
    });

    *inner.connection.borrow_mut() = Some(Connection {
        socket,
        _on_open: on_open,
        _on_message: on_message,
        _on_close: on_close,
        _heartbeat: heartbeat,
    });
}

fn schedule_reconnect(weak: Weak<FeedInner>) {
    // Never drop the connection from inside its own on_close handler
    Timeout::new(RECONNECT_DELAY_MS, move || {
        let Some(inner) = weak.upgrade() else { return };
        inner.connection.borrow_mut().take();
        let needed = inner.registry.borrow_mut().reconnect();
        if needed {
            connect(&inner);
        }
    })
    .forget();
}

impl ChangeFeed for RealtimeFeed {
    fn subscribe(
        &self,
        filter: ChangeFilter,
        on_insert: ChangeCallback,
        on_delete: ChangeCallback,
    ) -> SubscriptionHandle {
        let registered = self
            .inner
            .registry
            .borrow_mut()
            .add_listener(&filter, Listener { on_insert, on_delete });
        if registered.outgoing.is_some() {
            log::debug!("[REALTIME] join {}", registered.topic);
        }
        self.inner.write(registered.outgoing);
        connect(&self.inner);

        let weak = Rc::downgrade(&self.inner);
        let (topic, id) = (registered.topic, registered.id);
        SubscriptionHandle::new(move || {
            let Some(inner) = weak.upgrade() else { return };
            let leave = inner.registry.borrow_mut().remove_listener(&topic, id);
            if leave.is_some() {
                log::debug!("[REALTIME] leave {}", topic);
            }
            inner.write(leave);
        })
    }
}
