pub mod tracker;

pub use tracker::{SessionStats, WIN_BLOCK};
