pub mod outcome;
pub mod story;
pub mod verdict;

pub use outcome::*;
pub use story::*;
pub use verdict::*;
