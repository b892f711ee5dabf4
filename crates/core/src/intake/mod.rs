pub mod image_loader;
pub mod image_reference;
