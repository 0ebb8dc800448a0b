pub mod media;
pub mod permissions;
