pub mod audio;
pub mod config;
pub mod error;
pub mod lang;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod translate;

pub use config::{Backend, Config};
pub use error::{Result, SubtransError};
pub use media::{MediaOutcome, MediaPipeline, MediaStage};
pub use subtitle::SubtitleBlock;
pub use translate::{
    create_translator, TranslationOrchestrator, TranslationOutcome, TranslationStatus, Translator,
};
