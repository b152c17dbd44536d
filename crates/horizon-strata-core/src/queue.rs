//! The root event queue.
//!
//! The queue owns every record it holds. Records enter through
//! [`EventQueue::enqueue`], which filters by the queue's queueable mask,
//! refuses a record it already holds, and coalesces mergeable records into an
//! earlier record of the same kind for the same widget. Merging keeps the
//! earlier record's position, so FIFO order is preserved modulo merges.
//!
//! Whether a kind is mergeable is a property of the target widget, which the
//! queue does not know about; the caller passes the widget's mergeable mask
//! along with the record.
//!
//! # Example
//!
//! ```
//! use horizon_strata_core::{EnqueueOutcome, Event, EventKinds, EventQueue, WidgetId};
//! use horizon_strata_render::Area;
//!
//! let mut queue = EventQueue::new();
//! let w = WidgetId::default();
//!
//! let merge = EventKinds::EXPOSE_REQUEST;
//! queue.enqueue(Event::expose_request(w, Area::new(0.0, 0.0, 10.0, 10.0)), merge);
//! let outcome = queue.enqueue(Event::expose_request(w, Area::new(20.0, 0.0, 10.0, 10.0)), merge);
//!
//! assert_eq!(outcome, EnqueueOutcome::Merged);
//! assert_eq!(queue.len(), 1);
//! assert_eq!(queue.pop().and_then(|e| e.area()), Some(Area::new(0.0, 0.0, 30.0, 10.0)));
//! ```

use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::event::{Event, EventId, EventKind, EventKinds, EventPayload, WidgetId};
use crate::logging::targets;

/// Kinds merged when a widget does not say otherwise.
pub const DEFAULT_MERGEABLE: EventKinds = EventKinds::EXPOSE_REQUEST
    .union(EventKinds::POINTER_MOTION)
    .union(EventKinds::POINTER_DRAG)
    .union(EventKinds::WHEEL_SCROLL);

/// What happened to a record handed to [`EventQueue::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Appended at the tail.
    Appended,
    /// Folded into an earlier record; the new record was dropped.
    Merged,
    /// The same record is already queued; nothing changed.
    Duplicate,
    /// The kind is not queueable; the record was dropped.
    Rejected,
}

/// FIFO queue of event records.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<Event>,
    ids: HashSet<EventId>,
    queueable: EventKinds,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Create an empty queue that accepts every kind.
    pub fn new() -> Self {
        Self::with_queueable(EventKinds::all())
    }

    /// Create an empty queue that accepts only the given kinds.
    pub fn with_queueable(queueable: EventKinds) -> Self {
        Self {
            events: VecDeque::new(),
            ids: HashSet::new(),
            queueable,
        }
    }

    /// Kinds the queue accepts.
    pub fn queueable(&self) -> EventKinds {
        self.queueable
    }

    /// Change the accepted kinds. Already queued records are kept.
    pub fn set_queueable(&mut self, queueable: EventKinds) {
        self.queueable = queueable;
    }

    /// Whether records of `kind` may be queued.
    pub fn is_queueable(&self, kind: EventKind) -> bool {
        self.queueable.contains(kind.flag())
    }

    /// Hand a record to the queue.
    ///
    /// `mergeable` is the target widget's mergeable mask.
    pub fn enqueue(&mut self, event: Event, mergeable: EventKinds) -> EnqueueOutcome {
        if !self.is_queueable(event.kind()) {
            trace!(target: targets::QUEUE, kind = %event.kind(), "kind not queueable, dropped");
            return EnqueueOutcome::Rejected;
        }

        if self.ids.contains(&event.id()) {
            trace!(target: targets::QUEUE, id = event.id().as_raw(), "already queued");
            return EnqueueOutcome::Duplicate;
        }

        if mergeable.contains(event.kind().flag()) {
            let kind = event.kind();
            let widget = event.widget();
            if let Some(earlier) = self
                .events
                .iter_mut()
                .rev()
                .find(|e| e.kind() == kind && e.widget() == widget)
                && merge_payload(earlier, &event)
            {
                trace!(target: targets::QUEUE, %kind, into = earlier.id().as_raw(), "merged");
                return EnqueueOutcome::Merged;
            }
        }

        trace!(
            target: targets::QUEUE,
            kind = %event.kind(),
            id = event.id().as_raw(),
            len = self.events.len() + 1,
            "appended"
        );
        self.ids.insert(event.id());
        self.events.push_back(event);
        EnqueueOutcome::Appended
    }

    /// Remove and return the head record.
    pub fn pop(&mut self) -> Option<Event> {
        let event = self.events.pop_front()?;
        self.ids.remove(&event.id());
        Some(event)
    }

    /// Look at the head record without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.events.front()
    }

    /// Remove the record with `id` and hand it back.
    pub fn cancel(&mut self, id: EventId) -> Option<Event> {
        if !self.ids.remove(&id) {
            return None;
        }
        let index = self.events.iter().position(|e| e.id() == id)?;
        self.events.remove(index)
    }

    /// Remove and drop the record with `id`. Returns whether it was queued.
    pub fn delete(&mut self, id: EventId) -> bool {
        self.cancel(id).is_some()
    }

    /// Drop every record whose widget is `widget`. Returns how many were dropped.
    pub fn cancel_for_widget(&mut self, widget: WidgetId) -> usize {
        let before = self.events.len();
        let ids = &mut self.ids;
        self.events.retain(|e| {
            if e.widget() == widget {
                ids.remove(&e.id());
                false
            } else {
                true
            }
        });
        let dropped = before - self.events.len();
        if dropped > 0 {
            trace!(target: targets::QUEUE, widget = widget.as_raw(), dropped, "cancelled for widget");
        }
        dropped
    }

    /// Whether a record with `id` is queued.
    pub fn contains(&self, id: EventId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over the queued records, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.events.clear();
        self.ids.clear();
    }
}

/// Fold `newer` into `earlier`. Returns `false` for kinds that never merge.
fn merge_payload(earlier: &mut Event, newer: &Event) -> bool {
    match (earlier.payload_mut(), newer.payload()) {
        (
            EventPayload::Pointer {
                position,
                delta,
                button,
            },
            EventPayload::Pointer {
                position: new_position,
                delta: new_delta,
                button: new_button,
            },
        ) => {
            *position = *new_position;
            *delta += *new_delta;
            *button = *new_button;
            true
        }
        (
            EventPayload::Wheel { position, delta },
            EventPayload::Wheel {
                position: new_position,
                delta: new_delta,
            },
        ) => {
            *position = *new_position;
            *delta += *new_delta;
            true
        }
        (EventPayload::Area(area), EventPayload::Area(new_area))
            if newer.kind() == EventKind::ExposeRequest =>
        {
            *area = area.union(new_area);
            true
        }
        (EventPayload::Value(value), EventPayload::Value(new_value)) => {
            *value = new_value.clone();
            true
        }
        _ => false,
    }
}
