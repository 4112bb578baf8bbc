pub mod file_loader;

pub use file_loader::{collect_input_files, load_input_dir};
