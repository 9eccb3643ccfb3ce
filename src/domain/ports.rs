use std::time::Duration;

/// Settings a session needs, independent of where they were loaded from.
pub trait ConfigProvider {
    /// Batch input file; `None` selects interactive mode.
    fn input_file(&self) -> Option<&str>;
    /// Wall-clock budget for the whole run.
    fn timeout(&self) -> Duration;
    /// Prompt written before each interactive read. Empty disables it.
    fn prompt(&self) -> &str;
}
