pub mod chat;
pub mod extractor;
