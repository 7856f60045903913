//! Per-survivor task queue.
//!
//! Each survivor owns one [`TaskQueue`]: a FIFO of pending tasks plus at
//! most one task in flight. Scheduling is a loop rather than recursion, so
//! a long chain of tasks that finish synchronously never deepens the stack.
//!
//! Finished tasks are recorded as [`TaskReport`]s. The caller drains them
//! after every enqueue or advance to dispatch follow-ups (for example, the
//! job chain that starts once the survivor reaches its region).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::task::{Progress, Step, Task, TaskContext, TaskOutcome};

/// Sequence number assigned to a task when it is enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskTicket(pub u64);

impl core::fmt::Display for TaskTicket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished task and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Ticket issued at enqueue time.
    pub ticket: TaskTicket,
    /// The task that ran.
    pub task: Task,
    /// How it ended.
    pub outcome: TaskOutcome,
}

#[derive(Debug, Clone, PartialEq)]
struct InFlight {
    ticket: TaskTicket,
    task: Task,
    progress: Progress,
}

/// Ordered task queue with at most one task in flight.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    /// Tasks waiting to start, oldest first.
    pending: VecDeque<(TaskTicket, Task)>,
    /// The suspended task, if one is running. Doubles as the busy flag.
    in_flight: Option<InFlight>,
    /// Next ticket number to hand out.
    next_ticket: u64,
    /// Finished tasks not yet drained.
    reports: Vec<TaskReport>,
}

impl TaskQueue {
    /// Create an empty, idle queue.
    pub const fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            in_flight: None,
            next_ticket: 0,
            reports: Vec::new(),
        }
    }

    /// Whether a task is currently in flight.
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether nothing is running, pending, or waiting to be drained.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.pending.is_empty() && self.reports.is_empty()
    }

    /// Number of tasks in flight (0 or 1).
    pub const fn in_flight_count(&self) -> usize {
        if self.in_flight.is_some() { 1 } else { 0 }
    }

    /// Number of tasks waiting to start.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The task currently in flight.
    pub fn current(&self) -> Option<&Task> {
        self.in_flight.as_ref().map(|f| &f.task)
    }

    /// Pending tasks, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.pending.iter().map(|(_, task)| task)
    }

    /// Append `task` and start it if the queue is idle.
    pub fn enqueue(&mut self, task: Task, ctx: &mut TaskContext<'_>) -> TaskTicket {
        let ticket = self.issue_ticket();
        self.pending.push_back((ticket, task));
        self.schedule(ctx);
        ticket
    }

    /// Append every task in order, then start the head if idle.
    pub fn enqueue_all(
        &mut self,
        tasks: impl IntoIterator<Item = Task>,
        ctx: &mut TaskContext<'_>,
    ) -> Vec<TaskTicket> {
        let tickets = tasks
            .into_iter()
            .map(|task| {
                let ticket = self.issue_ticket();
                self.pending.push_back((ticket, task));
                ticket
            })
            .collect();
        self.schedule(ctx);
        tickets
    }

    /// Advance the in-flight task by `dt` simulated seconds.
    ///
    /// If it finishes, the next pending tasks start immediately (and any
    /// that finish synchronously are reported too).
    pub fn advance(&mut self, ctx: &mut TaskContext<'_>, dt: f32) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };
        match flight.task.resume(flight.progress, ctx, dt) {
            Step::Suspended(progress) => {
                self.in_flight = Some(InFlight { progress, ..flight });
            }
            Step::Finished(outcome) => {
                self.record(flight.ticket, flight.task, outcome, ctx);
                self.schedule(ctx);
            }
        }
    }

    /// Take every report produced since the last drain, in finish order.
    pub fn drain_reports(&mut self) -> Vec<TaskReport> {
        std::mem::take(&mut self.reports)
    }

    fn issue_ticket(&mut self) -> TaskTicket {
        let ticket = TaskTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        ticket
    }

    fn schedule(&mut self, ctx: &mut TaskContext<'_>) {
        while self.in_flight.is_none() {
            let Some((ticket, task)) = self.pending.pop_front() else {
                return;
            };
            match task.start(ctx) {
                Step::Suspended(progress) => {
                    self.in_flight = Some(InFlight {
                        ticket,
                        task,
                        progress,
                    });
                }
                Step::Finished(outcome) => self.record(ticket, task, outcome, ctx),
            }
        }
    }

    fn record(&mut self, ticket: TaskTicket, task: Task, outcome: TaskOutcome, ctx: &TaskContext<'_>) {
        match &outcome {
            TaskOutcome::Completed => {
                debug!(survivor = %ctx.survivor.id, ticket = %ticket, ?task, "Task completed");
            }
            TaskOutcome::Failed(failure) => {
                debug!(survivor = %ctx.survivor.id, ticket = %ticket, ?task, %failure, "Task failed");
            }
        }
        self.reports.push(TaskReport {
            ticket,
            task,
            outcome,
        });
    }
}
