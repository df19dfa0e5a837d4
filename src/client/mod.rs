pub mod api;
pub mod view;

pub use api::{ClientError, ConversationApi, HttpConversationApi};
pub use view::ConversationView;
