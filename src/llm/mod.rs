pub mod client;
pub mod prompts;
pub mod retry;
pub mod validation;

#[cfg(test)]
pub(crate) mod scripted;

pub use client::*;
pub use prompts::*;
pub use retry::*;
pub use validation::*;
