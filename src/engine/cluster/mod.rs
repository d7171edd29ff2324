pub mod local;
pub mod metadata;
pub mod ops;
