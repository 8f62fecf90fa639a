//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, PRIMARY_COLOR};
pub use renderer::{ChartText, RenderError, StaticChartRenderer};
