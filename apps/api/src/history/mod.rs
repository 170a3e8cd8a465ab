// Per-user prompt/output history. Written to by the generation handlers in the
// background; readable through its own endpoints.

pub mod handlers;
pub mod store;
