//! Observers interested in freshly built instances.
//!
//! One mutex guards the list. `notify` snapshots the observers under it and
//! fans out after releasing it, so callbacks run synchronously on the
//! notifying thread, in registration order, and may subscribe or unsubscribe
//! on the same list. Such changes take effect from the next notification.

use std::sync::Arc;

use parking_lot::Mutex;

pub trait InstanceObserver<T>: Send + Sync {
    fn on_new_instance(&self, instance: &T);
}

impl<T, F> InstanceObserver<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn on_new_instance(&self, instance: &T) {
        self(instance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub struct ObserverList<T> {
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    next_id:   u64,
    observers: Vec<(ObserverId, Arc<dyn InstanceObserver<T>>)>,
}

impl<T> ObserverList<T> {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner { next_id: 0, observers: Vec::new() }) }
    }

    pub fn subscribe(&self, observer: Arc<dyn InstanceObserver<T>>) -> ObserverId {
        let mut inner = self.inner.lock();
        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.observers.len();
        inner.observers.retain(|(oid, _)| *oid != id);
        inner.observers.len() != before
    }

    pub fn notify(&self, instance: &T) {
        let snapshot: Vec<Arc<dyn InstanceObserver<T>>> = self.inner.lock()
            .observers.iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        tracing::trace!(observers = snapshot.len(), "notify new instance");
        for observer in snapshot {
            observer.on_new_instance(instance);
        }
    }

    pub fn len(&self) -> usize { self.inner.lock().observers.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self { Self::new() }
}
