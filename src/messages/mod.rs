mod store;
mod types;

pub use store::MessageStore;
pub use types::{Message, Sender};
