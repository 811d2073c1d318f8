// /api/v1/persons - collection endpoints
pub mod create;
pub mod list;
pub mod search;

pub use create::create;
pub use list::list;
pub use search::search;
