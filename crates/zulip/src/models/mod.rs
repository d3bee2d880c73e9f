//! Domain models for retrieved messages

mod message;

pub use message::Message;
