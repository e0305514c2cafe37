pub mod create;
pub mod delete;
pub mod import;
pub mod read;
pub mod schema;
pub mod state;
pub mod update;
