pub mod migrations;
pub mod schema;
pub mod snapshot;
