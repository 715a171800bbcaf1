// Composition root for the orders bounded context.
//
// Responsibilities
// - Read config from environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into use case handlers.
// - Spawn background workers (outbox relay).
// - Expose the HTTP router to the binary.

pub mod config;
pub mod error;
pub mod http;
pub mod state;
pub mod workers;

#[cfg(test)]
pub mod test_support;
