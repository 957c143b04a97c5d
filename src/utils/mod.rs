pub mod json_file;
pub mod time;
