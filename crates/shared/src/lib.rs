pub mod listeners;
pub mod scheduler;

pub use listeners::{CountingListeners, GlobalListeners, ListenerGuard, ListenerId};
pub use scheduler::{IdleQueue, LocalTaskScheduler, Scheduler, Task, TaskId};
