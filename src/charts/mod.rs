//! Charts module - Chart rendering

mod plotter;

pub use plotter::{format_amount, ChartPlotter};
