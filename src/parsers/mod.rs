//! Chat export parsers.
//!
//! Each parser implements the [`Parser`](crate::parser::Parser) trait.
//!
//! # Available Parsers
//!
//! - [`WhatsAppParser`] - Parses WhatsApp TXT exports
//! - [`InstagramParser`] - Parses Instagram JSON exports

#[cfg(feature = "instagram")]
mod instagram;
#[cfg(feature = "whatsapp")]
mod whatsapp;

#[cfg(feature = "instagram")]
pub use instagram::InstagramParser;
#[cfg(feature = "whatsapp")]
pub use whatsapp::WhatsAppParser;
