//! Reusable drawing helpers shared by several screens.

pub mod bars;
pub mod loading;
pub mod picker;
pub mod rf_chart;
