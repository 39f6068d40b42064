pub mod frequency;
pub mod health;

pub use frequency::{analyze, read_form, Endpoint, UploadForm, UploadedFile};
pub use health::{health, index};
