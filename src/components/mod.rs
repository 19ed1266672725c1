pub mod guard;
pub mod image_upload;
pub mod layout;
pub mod prompt_card;
pub mod toaster;
