pub mod code;

pub use code::normalize_code;
