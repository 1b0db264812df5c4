//! Component-side listener registrations.
//!
//! The registry remembers every `on` call independently of whether the
//! component is mounted. Each registration records the nodes it is currently
//! attached to, so detaching undoes exactly what attaching did.

use super::listener::{Listener, ListenerOptions};
use crate::dom::node::NodeId;

/// One listener entry: event name + optional selector scope + listener + options.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Descendant selector inside the isolated subtree; `None` targets the component element.
    pub selector: Option<String>,
    pub listener: Listener,
    pub options: ListenerOptions,
    /// Nodes this registration is live on. Empty while unmounted.
    pub(crate) attached: Vec<NodeId>,
}

impl Registration {
    pub fn new(selector: Option<&str>, listener: Listener, options: ListenerOptions) -> Self {
        Self {
            selector: selector.map(str::to_owned),
            listener,
            options,
            attached: Vec::new(),
        }
    }

    /// Whether this registration matches an `off` request.
    pub fn matches(&self, selector: Option<&str>, listener: &Listener) -> bool {
        self.selector.as_deref() == selector && self.listener.same(listener)
    }

    /// Nodes this registration is currently attached to.
    pub fn attached(&self) -> &[NodeId] {
        &self.attached
    }

    pub fn is_live(&self) -> bool {
        !self.attached.is_empty()
    }
}

/// Registrations grouped by event name.
///
/// Event names keep their first-registration order and registrations within an
/// event keep insertion order, which is the order they are attached in.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    events: Vec<(String, Vec<Registration>)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration and return it for attachment.
    pub fn add(&mut self, event: &str, registration: Registration) -> &mut Registration {
        let index = match self.events.iter().position(|(name, _)| name == event) {
            Some(index) => index,
            None => {
                self.events.push((event.to_owned(), Vec::new()));
                self.events.len() - 1
            }
        };
        let list = &mut self.events[index].1;
        list.push(registration);
        let last = list.len() - 1;
        &mut list[last]
    }

    /// Remove the first registration matching `selector` and `listener` identity.
    pub fn remove_first(
        &mut self,
        event: &str,
        selector: Option<&str>,
        listener: &Listener,
    ) -> Option<Registration> {
        let index = self.events.iter().position(|(name, _)| name == event)?;
        let list = &mut self.events[index].1;
        let position = list.iter().position(|r| r.matches(selector, listener))?;
        let removed = list.remove(position);
        if list.is_empty() {
            self.events.remove(index);
        }
        Some(removed)
    }

    /// Registrations for one event, in insertion order.
    pub fn get(&self, event: &str) -> &[Registration] {
        self.events
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Every `(event, registration)` pair in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Registration)> {
        self.events
            .iter()
            .flat_map(|(name, list)| list.iter().map(move |r| (name.as_str(), r)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Registration)> {
        self.events
            .iter_mut()
            .flat_map(|(name, list)| {
                let name = name.as_str();
                list.iter_mut().map(move |r| (name, r))
            })
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.events.iter().map(|(_, list)| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event names with at least one registration.
    pub fn event_names(&self) -> Vec<&str> {
        self.events.iter().map(|(name, _)| name.as_str()).collect()
    }
}
