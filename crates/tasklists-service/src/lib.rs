mod local;
pub mod persist;
mod traits;

pub use local::LocalService;
pub use traits::{BoardService, ServiceError};
