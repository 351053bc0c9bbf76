pub mod file_tag;
pub mod repository;
pub mod session;
pub mod staging;
pub mod tag;
pub mod tagger;
pub mod tagging;
pub mod wake_word_file;

pub use file_tag::FileTagService;
pub use session::SessionService;
pub use staging::{AudioFileStager, StagingConfig};
pub use tag::TagService;
pub use tagger::TaggerService;
pub use wake_word_file::WakeWordFileService;
