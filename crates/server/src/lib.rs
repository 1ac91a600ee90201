pub mod routes;
pub mod startup;
pub mod state;
pub mod cors;
pub mod errors;
pub mod validation;
pub mod openapi;

pub use startup::{run, run_with_config};
pub use state::ServerState;
