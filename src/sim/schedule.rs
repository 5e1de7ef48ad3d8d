//! Deferred and repeating tasks on the simulation clock
//!
//! Replaces browser timers: tasks are plain data keyed by [`TaskId`] and are
//! fired by `tick` before the physics step, so a timer can land between two
//! frames but never inside one.

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// What a task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Spawn a random power-up
    SpawnPowerUp,
    /// Emit one particle from the held paint button
    EmitPaint,
    /// Undo one speed-up activation
    RevertSpeedUp,
}

/// How a repeating task handles periods that elapsed between two drains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missed {
    /// Fire once per elapsed period
    CatchUp,
    /// Fire once for the latest elapsed period and drop the rest
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub kind: TaskKind,
    pub due_ms: u64,
    /// Repeat period and missed-period policy (None = one-shot)
    pub every_ms: Option<(u64, Missed)>,
}

/// Pending tasks, fired in (due time, id) order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `kind` once at `due_ms`
    pub fn schedule_once(&mut self, kind: TaskKind, due_ms: u64) -> TaskId {
        self.push(kind, due_ms, None)
    }

    /// Run `kind` every `every_ms`, first at `start_ms + every_ms`
    pub fn schedule_repeating(
        &mut self,
        kind: TaskKind,
        start_ms: u64,
        every_ms: u64,
        missed: Missed,
    ) -> TaskId {
        // A zero period would fire forever within a single `pop_due` drain
        let every_ms = every_ms.max(1);
        self.push(kind, start_ms + every_ms, Some((every_ms, missed)))
    }

    fn push(&mut self, kind: TaskKind, due_ms: u64, every_ms: Option<(u64, Missed)>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            kind,
            due_ms,
            every_ms,
        });
        id
    }

    /// Remove a task. Returns false if it already fired (one-shot) or was
    /// never scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Remove every task of the given kind, returning how many were dropped
    pub fn cancel_kind(&mut self, kind: TaskKind) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.kind != kind);
        before - self.tasks.len()
    }

    /// Take the earliest task due at or before `now_ms`.
    ///
    /// Repeating tasks stay scheduled. With [`Missed::CatchUp`] the next due
    /// time advances by one period, so a long gap between frames fires once
    /// per elapsed period. With [`Missed::Skip`] the task fires once for the
    /// latest elapsed period and resumes on the period grid after `now_ms`.
    /// Returns the due time the task fired for.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TaskKind, u64)> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let task = &mut self.tasks[idx];
        let every_ms = task.every_ms;
        match every_ms {
            Some((every, Missed::CatchUp)) => {
                let fired = (task.kind, task.due_ms);
                task.due_ms += every;
                Some(fired)
            }
            Some((every, Missed::Skip)) => {
                task.due_ms += (now_ms - task.due_ms) / every * every;
                let fired = (task.kind, task.due_ms);
                task.due_ms += every;
                Some(fired)
            }
            None => {
                let task = self.tasks.remove(idx);
                Some((task.kind, task.due_ms))
            }
        }
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Number of pending tasks of a kind
    pub fn pending(&self, kind: TaskKind) -> usize {
        self.tasks.iter().filter(|t| t.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
