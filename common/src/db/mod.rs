// Database layer: connection pool, request-scoped units of work, repositories

pub mod pool;
pub mod repositories;
pub mod schema;
pub mod unit_of_work;

pub use pool::DbPool;
pub use unit_of_work::UnitOfWork;
