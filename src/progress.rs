//! Progress display for tool installations

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a sequential tool install run
pub struct ProgressDisplay {
    /// One bar across all declared tools
    tool_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total tool count
    pub fn new(total_tools: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let tool_pb = ProgressBar::new(total_tools);
        tool_pb.set_style(style);
        tool_pb.enable_steady_tick(Duration::from_millis(120));

        Self { tool_pb }
    }

    /// Update to show the tool currently being worked on
    pub fn update_tool(&self, tool: &str, spec: &str) {
        let msg = if spec.is_empty() {
            tool.to_string()
        } else {
            format!("{tool} {spec}")
        };
        self.tool_pb.set_message(msg);
    }

    /// Advance past a finished tool
    pub fn inc_tool(&self) {
        self.tool_pb.inc(1);
    }

    /// Finish successfully
    pub fn finish(&self) {
        self.tool_pb.finish_with_message("done");
    }

    /// Abandon on error, leaving the bar visible
    pub fn abandon(&self) {
        self.tool_pb.abandon();
    }
}
