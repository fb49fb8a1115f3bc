pub mod stage1_draft;
pub mod stage2_evaluate;
pub mod stage3_revise;
pub mod story_loop;

pub use stage1_draft::*;
pub use stage2_evaluate::*;
pub use stage3_revise::*;
pub use story_loop::*;
