//! Pallet loading calculations: how many boxes of one size fit on a pallet
//! under a height limit, and whether two different boxes can share one.

pub mod columns;
pub mod combination;
pub mod config;
pub mod layout;
pub mod orientation;
pub mod parse;
pub mod render;
pub mod report;
pub mod solver;
pub mod types;

pub use combination::{evaluate_combination_for_group, evaluate_combination_pair};
pub use config::PalletConfig;
pub use orientation::{compute_box_metrics, find_best_orientation, unique_orientations};
pub use parse::{GroupKey, RawValue, cm_to_mm, mm_to_cm_string, parse_dimension};
pub use solver::Solver;
