// Composition root for the repository_charts bounded context.
//
// Responsibilities
// - Read config from the environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into use case handlers and routes.

pub mod config;
pub mod http;
pub mod state;
