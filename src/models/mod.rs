pub mod extraction_result;
pub mod input_file;
pub mod loaders;
pub mod mime;

pub use extraction_result::{BatchStats, ExtractionResult, ResultSet};
pub use input_file::InputFile;
pub use loaders::{collect_input_files, load_input_dir};
pub use mime::{detect_mime_type, is_accepted_file, ACCEPTED_EXTENSIONS};
