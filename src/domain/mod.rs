pub mod service;
pub mod task;
pub mod user;

pub use service::TaskService;
pub use task::{
    NewTask, Task, TaskChanges, TaskPriority, TaskRepository, TaskStats, TaskStatus,
};
pub use user::{User, UserRepository};
