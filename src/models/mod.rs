pub mod access;
pub mod did;
