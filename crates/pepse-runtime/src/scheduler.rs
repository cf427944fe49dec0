use std::collections::{BTreeMap, VecDeque};

use crate::objects::EntityId;

/// Seconds to whole microseconds, saturating at zero for negative input.
#[inline]
pub fn secs_to_us(secs: f32) -> u64 {
    (secs.max(0.0) as f64 * 1_000_000.0).round() as u64
}

pub struct Scheduled<T> {
    pub id: u64,
    pub due_us: u64,
    /// Object the task belongs to. Tasks of removed owners never run.
    pub owner: Option<EntityId>,
    pub task: T,
}

/// Time-keyed task queue. Tasks due at the same instant run in emission order.
pub struct Scheduler<T> {
    // due time (us) -> FIFO of tasks
    by_time: BTreeMap<u64, VecDeque<Scheduled<T>>>,
    now_us: u64,
    next_id: u64,
    pending: usize,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            by_time: BTreeMap::new(),
            now_us: 0,
            next_id: 1,
            pending: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_at(&mut self, due_us: u64, owner: Option<EntityId>, task: T) -> u64 {
        let id = self.alloc_id();
        let due_us = due_us.max(self.now_us);
        self.by_time.entry(due_us).or_default().push_back(Scheduled { id, due_us, owner, task });
        self.pending += 1;
        id
    }

    pub fn emit_now(&mut self, owner: Option<EntityId>, task: T) -> u64 {
        self.emit_at(self.now_us, owner, task)
    }

    pub fn emit_after(&mut self, delay_secs: f32, owner: Option<EntityId>, task: T) -> u64 {
        self.emit_at(self.now_us.saturating_add(secs_to_us(delay_secs)), owner, task)
    }

    pub fn advance(&mut self, dt: f32) {
        self.now_us = self.now_us.saturating_add(secs_to_us(dt));
    }

    /// Earliest task whose due time has passed, if any.
    pub fn pop_due(&mut self) -> Option<Scheduled<T>> {
        let mut entry = self.by_time.first_entry()?;
        if *entry.key() > self.now_us {
            return None;
        }
        let task = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        if task.is_some() {
            self.pending -= 1;
        }
        task
    }

    #[inline]
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    #[inline]
    pub fn now_secs(&self) -> f32 {
        (self.now_us as f64 / 1_000_000.0) as f32
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }
}
