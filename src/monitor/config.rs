use crate::monitor::expr::ExprConfig;

pub const DEFAULT_PROMPT: &str = "(nemu) ";
pub const DEFAULT_WATCHPOINT_LIMIT: usize = 32;
/// Bytes per word printed by the memory scan command.
pub const SCAN_WORD_BYTES: usize = 4;

/// Console settings. `batch` suppresses the prompt for scripted input.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub prompt: String,
    pub batch: bool,
    pub watchpoint_limit: usize,
    pub expr: ExprConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            batch: false,
            watchpoint_limit: DEFAULT_WATCHPOINT_LIMIT,
            expr: ExprConfig::default(),
        }
    }
}
