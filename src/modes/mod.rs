pub mod headless;
pub mod human;

pub use headless::{HeadlessMode, HeadlessOptions, RunSummary};
pub use human::HumanMode;
