// Context assembly module
// Public interface for token-budgeted context assembly

mod assembler;

pub use assembler::{estimate_tokens, Assembly, ContextBuffer};
