pub mod auth;
pub mod file_tag;
pub mod session;
pub mod tag;
pub mod tagger;
pub mod wake_word_file;

pub use auth::Claims;
pub use file_tag::{TagPostRequest, TagPostResponse, WakeWordFileTag};
pub use session::Session;
pub use tag::{Tag, TagAssignmentResponse, TagQuery};
pub use tagger::Tagger;
pub use wake_word_file::TaggableFile;
