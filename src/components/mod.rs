//! UI components.

pub mod ia_diagram;
