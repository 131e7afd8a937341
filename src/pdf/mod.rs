pub mod content;
pub mod document;
#[cfg(test)]
pub mod fixture;
pub mod text;

pub use document::PdfDocument;
