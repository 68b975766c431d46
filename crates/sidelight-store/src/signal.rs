//! Typed subscriber registries.
//!
//! One `Signal` per notification class. Subscribers run synchronously, in
//! registration order, and registration returns a revocable id. Duplicate
//! registrations are not deduplicated.

/// Handle returned by [`Signal::subscribe`]; pass to [`Signal::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<E> = Box<dyn FnMut(&E)>;

pub struct Signal<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<E>)>,
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Signal<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false when the id was already revoked or never issued.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<E> std::fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
