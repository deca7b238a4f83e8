pub mod board;
pub mod error;
pub mod ids;
pub mod list;
pub mod task;
pub mod view;

pub use board::Board;
pub use error::TasklistsError;
pub use list::{Collection, ListId, TaskList};
pub use task::{Priority, Task, TaskId};
pub use view::{ListView, Progress, ProjectionCache};
