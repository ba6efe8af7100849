//! Player input queue
//!
//! Actions arrive from the input layer at any time and are applied in order.
//! A rotation plays a short animation and holds the rest of the queue until
//! it completes; the lane offset changes when the animation ends.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    RotateLeft,
    RotateRight,
    Fire,
}

/// A rotation animation in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Rotation {
    action: InputAction,
    elapsed_ms: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputQueue {
    queue: VecDeque<InputAction>,
    capacity: usize,
    duration_ms: f32,
    rotating: Option<Rotation>,
}

impl InputQueue {
    pub fn new(capacity: usize, rotation_duration_ms: f32) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            duration_ms: rotation_duration_ms.max(0.0),
            rotating: None,
        }
    }

    /// Enqueue an action; dropped (returns false) when the queue is full
    pub fn push(&mut self, action: InputAction) -> bool {
        if self.queue.len() >= self.capacity {
            log::debug!("Input queue full, dropping {:?}", action);
            return false;
        }
        self.queue.push_back(action);
        true
    }

    /// Next action to apply, unless a rotation is still animating.
    /// Rotations popped here start their animation.
    pub fn pop_ready(&mut self) -> Option<InputAction> {
        if self.rotating.is_some() {
            return None;
        }
        let action = self.queue.pop_front()?;
        if action != InputAction::Fire {
            self.rotating = Some(Rotation {
                action,
                elapsed_ms: 0.0,
            });
        }
        Some(action)
    }

    /// Advance the rotation animation; returns the rotation that just finished
    pub fn advance(&mut self, dt_ms: f32) -> Option<InputAction> {
        let rotation = self.rotating.as_mut()?;
        rotation.elapsed_ms += dt_ms.max(0.0);
        if rotation.elapsed_ms >= self.duration_ms {
            let done = rotation.action;
            self.rotating = None;
            return Some(done);
        }
        None
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating.is_some()
    }

    /// Animation progress of the current rotation, in `[0, 1]`
    pub fn rotation_progress(&self) -> f32 {
        match self.rotating {
            Some(r) if self.duration_ms > 0.0 => (r.elapsed_ms / self.duration_ms).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.rotating = None;
    }
}
