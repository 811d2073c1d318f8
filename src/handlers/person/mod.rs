// /api/v1/person/:id - single record endpoints
pub mod delete;
pub mod get;
pub mod update;

pub use delete::delete;
pub use get::get;
pub use update::update;
