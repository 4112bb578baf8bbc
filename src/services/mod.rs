pub mod error_classifier;
pub mod export_service;

pub use error_classifier::{classify, classify_error, user_message_for, user_message_for_error};
pub use export_service::{
    concatenated_text, export_bundle, export_file_name, save_text, save_zip_archive,
    write_zip_archive, ExportEntry, DEFAULT_ARCHIVE_NAME,
};
