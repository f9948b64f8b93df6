//! Local services for the desktop app: document extraction and the files
//! the app keeps on disk (settings, API key, history, exported results).

pub mod app_dirs;
pub mod credentials;
pub mod export;
pub mod extractor;
pub mod history;

pub use app_dirs::AppDirs;
pub use credentials::CredentialStore;
pub use extractor::{extract, extract_as, DocumentKind, DOCX_EMPTY_NOTICE};
pub use history::{HistoryEntry, InteractionHistory};
