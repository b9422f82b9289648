//! Change notification channel.
//!
//! [`ChangeDispatcher`] carries every attribute-change event of an
//! application. It is a cheap cloneable handle passed to content providers
//! and bindings at construction time.
//!
//! # Invariants
//!
//! 1. Events are delivered synchronously, in publish order.
//! 2. Subscribers are notified in registration order.
//! 3. An event published from inside a subscriber is queued and delivered
//!    after the current event has reached every subscriber.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    callback invocation, even mid-delivery.
//!
//! Single-threaded: the dispatcher uses `Rc`/`RefCell` and is `!Send`.

use mdrt_types::TypedValue;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Topic name of attribute-change events.
pub const ON_CHANGE_TOPIC: &str = "contentProvider/onChange";

/// An attribute of a content provider changed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub provider_id: String,
    pub attribute: String,
    pub new_value: TypedValue,
    pub old_value: TypedValue,
}

impl ChangeEvent {
    pub const TOPIC: &'static str = ON_CHANGE_TOPIC;
}

type Callback = Rc<dyn Fn(&ChangeEvent)>;

#[derive(Default)]
struct Inner {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(u64, Callback)>>,
    queue: RefCell<VecDeque<ChangeEvent>>,
    delivering: Cell<bool>,
}

impl Inner {
    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.borrow().iter().any(|(sid, _)| *sid == id)
    }

    fn remove(&self, id: u64) {
        self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
    }
}

/// Ends a delivery even if a subscriber panics. Events still queued by an
/// aborted delivery are discarded rather than leaked into the next publish.
struct DeliveryGuard<'a>(&'a Inner);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0.queue.borrow_mut().clear();
        self.0.delivering.set(false);
    }
}

/// Publish/subscribe channel for [`ChangeEvent`]s.
#[derive(Clone, Default)]
pub struct ChangeDispatcher {
    inner: Rc<Inner>,
}

impl ChangeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for every subsequent event.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&ChangeEvent) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Publishes an event to every subscriber.
    ///
    /// Returns once the event (and anything published while delivering it)
    /// has been delivered, unless this call is itself nested inside a
    /// delivery, in which case the event is queued and the outer call
    /// delivers it.
    pub fn publish(&self, event: ChangeEvent) {
        self.inner.queue.borrow_mut().push_back(event);
        if self.inner.delivering.get() {
            trace!(topic = ON_CHANGE_TOPIC, "Queued nested change event");
            return;
        }
        self.inner.delivering.set(true);
        let _guard = DeliveryGuard(&self.inner);

        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            trace!(
                topic = ON_CHANGE_TOPIC,
                provider = %event.provider_id,
                attribute = %event.attribute,
                "Delivering change event"
            );
            let subscribers: Vec<(u64, Callback)> = self.inner.subscribers.borrow().clone();
            for (id, callback) in subscribers {
                if self.inner.is_subscribed(id) {
                    callback(&event);
                }
            }
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// True while an event is being delivered.
    pub fn is_delivering(&self) -> bool {
        self.inner.delivering.get()
    }
}

impl fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeDispatcher")
            .field("subscribers", &self.subscriber_count())
            .field("queued", &self.inner.queue.borrow().len())
            .finish()
    }
}

/// RAII guard for a dispatcher callback. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    /// Unsubscribes explicitly.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// True while the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.is_subscribed(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
