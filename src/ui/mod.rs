/// Rendering layer for the iced front-end
///
/// - Retained page state driven by render instructions (page.rs)
/// - The searchable card grid (grid.rs)
/// - The recipe detail view (detail.rs)

pub mod detail;
pub mod grid;
pub mod page;
