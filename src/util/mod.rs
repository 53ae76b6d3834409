mod format;

pub use format::{format_byte_size, format_percent, format_timestamp};
