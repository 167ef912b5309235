pub mod pool;
pub mod schema;
pub mod tasks;
pub mod users;

pub use pool::{create_pool, health_check, run_migrations};
pub use tasks::PostgresTaskRepository;
pub use users::PostgresUserRepository;
