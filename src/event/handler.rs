//! Event dispatch over a [`SharedHost`].
//!
//! The propagation path and every node's listener list are snapshotted before
//! any listener runs, and the host borrow is released around each call, so
//! listeners are free to mutate the host (attach, detach, emit).

use super::message::{Event, Phase};
use crate::dom::node::NodeId;
use crate::host::{PathEntry, SharedHost};

/// Dispatch `event` at `target`.
///
/// Capture listeners run from the root down to (excluding) the target, every
/// listener on the target runs in registration order, then bubble listeners
/// run back up when the event bubbles. Returns `false` if a listener canceled
/// the event.
pub fn dispatch(host: &SharedHost, target: NodeId, event: &mut Event) -> bool {
    let path = host.borrow().propagation_path(target, event.composed());
    let Some((at_target, ancestors)) = path.split_first() else {
        return true;
    };

    event.propagation_stopped = false;
    event.immediate_propagation_stopped = false;

    event.phase = Phase::Capturing;
    for entry in ancestors.iter().rev() {
        invoke(host, entry, event, Some(true));
        if event.propagation_stopped {
            return finish(event);
        }
    }

    event.phase = Phase::AtTarget;
    invoke(host, at_target, event, None);
    if event.propagation_stopped || !event.bubbles() {
        return finish(event);
    }

    event.phase = Phase::Bubbling;
    for entry in ancestors {
        invoke(host, entry, event, Some(false));
        if event.propagation_stopped {
            break;
        }
    }

    finish(event)
}

/// The ordered list of nodes an event at `target` visits, target first.
pub fn bubble_path(host: &SharedHost, target: NodeId, composed: bool) -> Vec<NodeId> {
    host.borrow()
        .propagation_path(target, composed)
        .into_iter()
        .map(|entry| entry.node)
        .collect()
}

/// Run the listeners of one node. `capture` filters by phase; `None` runs all.
fn invoke(host: &SharedHost, entry: &PathEntry, event: &mut Event, capture: Option<bool>) {
    let listeners = host.borrow().listeners(entry.node, event.name());
    event.current_target = Some(entry.node);
    event.target = Some(entry.target);

    for (listener, options) in listeners {
        if capture.is_some_and(|c| c != options.capture) {
            continue;
        }
        if options.once {
            host.borrow_mut()
                .remove_event_listener(entry.node, event.name(), &listener, options.capture);
        }
        event.in_passive_listener = options.passive;
        listener.call(event);
        event.in_passive_listener = false;
        if event.immediate_propagation_stopped {
            break;
        }
    }
}

fn finish(event: &mut Event) -> bool {
    event.phase = Phase::None;
    event.current_target = None;
    !event.default_prevented()
}
