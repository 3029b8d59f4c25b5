pub mod extract;
pub mod levels;
pub mod merge;
pub mod split;
