//! Deferred, cancelable task delivery on the host's event loop.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use tokio::task::JoinHandle;
use tracing::trace;

pub type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// Runs a task on a later turn of the event loop.
///
/// A scheduled task runs at most once. Cancelling a task that already ran or
/// was never scheduled does nothing.
pub trait Scheduler {
    fn schedule(&self, task: Task) -> TaskId;
    fn cancel(&self, id: TaskId);
}

/// Single-threaded queue drained by the host when it goes idle.
#[derive(Default)]
pub struct IdleQueue {
    next_id: Cell<u64>,
    tasks: RefCell<VecDeque<(TaskId, Task)>>,
}

impl IdleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Runs every task queued before this call and returns how many ran.
    ///
    /// Tasks scheduled while draining wait for the next call.
    pub fn run_pending(&self) -> usize {
        let limit = TaskId(self.next_id.get());
        let mut ran = 0;

        loop {
            // Release the borrow before running so tasks may schedule or cancel.
            let next = {
                let mut tasks = self.tasks.borrow_mut();
                let ready = matches!(tasks.front(), Some((id, _)) if *id < limit);
                if ready { tasks.pop_front() } else { None }
            };

            let Some((id, task)) = next else {
                break;
            };

            trace!("running idle task {id:?}");
            task();
            ran += 1;
        }

        ran
    }
}

impl Scheduler for IdleQueue {
    fn schedule(&self, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.tasks.borrow_mut().push_back((id, task));
        id
    }

    fn cancel(&self, id: TaskId) {
        self.tasks.borrow_mut().retain(|(queued, _)| *queued != id);
    }
}

impl fmt::Debug for IdleQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleQueue")
            .field("next_id", &self.next_id.get())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Schedules tasks on the current tokio `LocalSet`.
///
/// Each task yields once before it runs, so it lands on a later turn than the
/// caller. Must be used from inside a `LocalSet`.
#[derive(Default)]
pub struct LocalTaskScheduler {
    next_id: Cell<u64>,
    handles: RefCell<HashMap<TaskId, JoinHandle<()>>>,
}

impl LocalTaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for LocalTaskScheduler {
    fn schedule(&self, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let mut handles = self.handles.borrow_mut();
        handles.retain(|_, handle| !handle.is_finished());

        let handle = tokio::task::spawn_local(async move {
            tokio::task::yield_now().await;
            task();
        });
        handles.insert(id, handle);

        id
    }

    fn cancel(&self, id: TaskId) {
        if let Some(handle) = self.handles.borrow_mut().remove(&id) {
            handle.abort();
        }
    }
}

impl fmt::Debug for LocalTaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTaskScheduler")
            .field("next_id", &self.next_id.get())
            .field("tracked", &self.handles.borrow().len())
            .finish()
    }
}
