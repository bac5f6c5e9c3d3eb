//! Checks that read raw file text.

pub mod long_line;
pub mod remove_tab;
pub mod remove_trailing_whitespace;

pub use long_line::LongLineCheck;
pub use remove_tab::RemoveTabCheck;
pub use remove_trailing_whitespace::RemoveTrailingWhitespaceCheck;
