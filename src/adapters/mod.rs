// Adapters layer: concrete implementations of the domain ports against
// external formats (zip archives, template engine).

pub mod docx;

pub use docx::DocxEngine;
