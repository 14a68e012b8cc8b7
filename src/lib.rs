// Library exports for parcelnotes crate
// This allows tests and the CLI binary to use the modules

pub mod config;
pub mod store;

// Notification text extraction engine
pub mod parser;

pub use parser::{
    default_parser, parse_message, Lexicon, LexiconError, MessageParser, ParsedMessage,
};
