//! Host tab event channels
//!
//! Two inbound channels per window, "add tab" and "remove tab", each
//! payload a serialized tab token. Subscribing registers a callback and
//! returns a handle; dropping the handle unregisters it. Delivery is
//! synchronous, in arrival order, exactly once per registered handler,
//! and only while subscribed.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use vellum_core::{CollectionHandle, Tab};

type Handler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Add,
    Remove,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    add: Vec<(u64, Handler)>,
    remove: Vec<(u64, Handler)>,
}

impl Registry {
    fn handlers(&mut self, channel: Channel) -> &mut Vec<(u64, Handler)> {
        match channel {
            Channel::Add => &mut self.add,
            Channel::Remove => &mut self.remove,
        }
    }
}

/// One window's pair of host→view tab channels.
#[derive(Clone, Default)]
pub struct TabEvents {
    registry: Arc<Mutex<Registry>>,
}

/// Registration handle; dropping it unsubscribes.
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    channel: Channel,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .handlers(self.channel)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl TabEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_add(&self, handler: impl Fn(&str) + Send + Sync + 'static) -> Subscription {
        self.subscribe(Channel::Add, Arc::new(handler))
    }

    pub fn subscribe_remove(
        &self,
        handler: impl Fn(&str) + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribe(Channel::Remove, Arc::new(handler))
    }

    /// Deliver an "add tab" message.
    pub fn publish_add(&self, token: &str) {
        self.deliver(Channel::Add, token);
    }

    /// Deliver a "remove tab" message.
    pub fn publish_remove(&self, token: &str) {
        self.deliver(Channel::Remove, token);
    }

    fn subscribe(&self, channel: Channel, handler: Handler) -> Subscription {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers(channel).push((id, handler));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            channel,
            id,
        }
    }

    fn deliver(&self, channel: Channel, token: &str) {
        // Snapshot the handler list so a handler can subscribe or
        // publish without deadlocking.
        let handlers: Vec<Handler> = self
            .registry
            .lock()
            .handlers(channel)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler(token);
        }
    }
}

/// Wires a window's channels to its collection: host "add" parses the
/// token and opens the tab, host "remove" parses and closes it. A
/// malformed payload is logged and dropped. The binding owns its
/// subscriptions; dropping it releases both channels.
pub struct TabEventBinding {
    _add: Subscription,
    _remove: Subscription,
}

impl TabEventBinding {
    pub fn bind(events: &TabEvents, handle: CollectionHandle) -> Self {
        let add_handle = handle.clone();
        let add = events.subscribe_add(move |token| match Tab::from_token(token) {
            Ok(tab) => {
                add_handle.mutate(|collection| collection.add_tab(tab));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed host add-tab payload");
            }
        });

        let remove = events.subscribe_remove(move |token| match Tab::from_token(token) {
            Ok(tab) => {
                handle.mutate(|collection| {
                    collection.remove([tab.id.as_str()]);
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed host remove-tab payload");
            }
        });

        Self {
            _add: add,
            _remove: remove,
        }
    }
}

/// Await a drag payload's text read, then land the parsed tab.
///
/// The read may outlive the view that started it; a disposed collection
/// handle swallows the result.
pub async fn land_text_drop<F>(handle: CollectionHandle, read: F)
where
    F: std::future::Future<Output = Option<String>>,
{
    let Some(text) = read.await else {
        return;
    };

    match Tab::from_token(&text) {
        Ok(tab) => {
            if handle.mutate(|collection| collection.add_tab(tab)).is_none() {
                tracing::debug!("Text drop landed after teardown, dropping");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Dropped text is not a tab token, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vellum_core::TabCollection;

    fn bound_collection(events: &TabEvents) -> (CollectionHandle, TabEventBinding) {
        let handle = CollectionHandle::new(TabCollection::new());
        let binding = TabEventBinding::bind(events, handle.clone());
        (handle, binding)
    }

    #[test]
    fn test_delivery_in_arrival_order() {
        let events = TabEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _subscription = events.subscribe_add(move |token| {
            seen_clone.lock().push(token.to_string());
        });

        events.publish_add("one");
        events.publish_add("two");
        events.publish_add("three");

        assert_eq!(*seen.lock(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_unsubscribed_handler_not_called() {
        let events = TabEvents::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let subscription = events.subscribe_add(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        events.publish_add("one");
        drop(subscription);
        events.publish_add("two");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resubscription_delivers_exactly_once() {
        let events = TabEvents::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first_calls = Arc::clone(&calls);
        let first = events.subscribe_add(move |_| {
            first_calls.fetch_add(1, Ordering::SeqCst);
        });
        drop(first);

        let second_calls = Arc::clone(&calls);
        let _second = events.subscribe_add(move |_| {
            second_calls.fetch_add(1, Ordering::SeqCst);
        });

        events.publish_add("one");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_binding_applies_host_add_and_remove() {
        let events = TabEvents::new();
        let (handle, _binding) = bound_collection(&events);

        let tab = Tab::new("Pushed from host");
        let token = tab.to_token().unwrap();

        events.publish_add(&token);
        assert!(handle.read(|collection| collection.contains(&tab.id)));

        events.publish_remove(&token);
        assert!(handle.read(|collection| !collection.contains(&tab.id)));
    }

    #[test]
    fn test_host_add_is_idempotent() {
        let events = TabEvents::new();
        let (handle, _binding) = bound_collection(&events);

        let token = Tab::new("Pushed twice").to_token().unwrap();
        events.publish_add(&token);
        events.publish_add(&token);

        assert_eq!(handle.read(|collection| collection.len()), 1);
    }

    #[test]
    fn test_host_remove_for_absent_id_is_noop() {
        let events = TabEvents::new();
        let (handle, _binding) = bound_collection(&events);

        let opened = Tab::new("Stays");
        events.publish_add(&opened.to_token().unwrap());

        events.publish_remove(&Tab::new("Never opened").to_token().unwrap());

        assert_eq!(handle.read(|collection| collection.len()), 1);
    }

    #[test]
    fn test_malformed_payload_swallowed() {
        let events = TabEvents::new();
        let (handle, _binding) = bound_collection(&events);

        events.publish_add("not a token");
        events.publish_remove("{\"v\":9}");

        assert!(handle.read(|collection| collection.is_empty()));
    }

    #[test]
    fn test_dropped_binding_releases_channels() {
        let events = TabEvents::new();
        let (handle, binding) = bound_collection(&events);

        drop(binding);
        events.publish_add(&Tab::new("Late").to_token().unwrap());

        assert!(handle.read(|collection| collection.is_empty()));
    }

    #[tokio::test]
    async fn test_text_drop_lands_after_read() {
        let handle = CollectionHandle::new(TabCollection::new());
        let tab = Tab::new("Dropped");
        let token = tab.to_token().unwrap();

        land_text_drop(handle.clone(), async move { Some(token) }).await;

        assert!(handle.read(|collection| collection.contains(&tab.id)));
    }

    #[tokio::test]
    async fn test_text_drop_on_disposed_collection_is_dropped() {
        let handle = CollectionHandle::new(TabCollection::new());
        let token = Tab::new("Too late").to_token().unwrap();

        // The view goes away while the read is in flight
        handle.dispose();
        land_text_drop(handle.clone(), async move { Some(token) }).await;

        assert!(handle.read(|collection| collection.is_empty()));
    }

    #[tokio::test]
    async fn test_text_drop_read_failure_is_noop() {
        let handle = CollectionHandle::new(TabCollection::new());

        land_text_drop(handle.clone(), async { None }).await;

        assert!(handle.read(|collection| collection.is_empty()));
    }
}
