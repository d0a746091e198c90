//! Output buffering and execution-trace bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

// =============================================================================
// TRACE
// =============================================================================

/// Point-in-time capture of a run, used by the UI to step through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSnapshot {
    /// Steps executed so far.
    pub step: usize,
    /// Statement kind just executed, or `start` / `finish`.
    pub marker: String,
    /// Source line of that statement.
    pub line: Option<usize>,
    /// Global variables after the step.
    pub variables: BTreeMap<String, Value>,
    /// Output visible so far, including an open `Sin Saltar` line.
    pub outputs: Vec<String>,
}

/// Step counter and bounded trace buffer for one run.
#[derive(Debug, Clone)]
pub(crate) struct ExecutionMetrics {
    pub(crate) steps: usize,
    pub(crate) trace: Vec<TraceSnapshot>,
    pub(crate) truncated: bool,
    capacity: usize,
}

impl ExecutionMetrics {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            steps: 0,
            trace: Vec::new(),
            truncated: false,
            capacity,
        }
    }

    /// True while snapshots are still being kept.
    pub(crate) fn has_room(&mut self) -> bool {
        if self.trace.len() < self.capacity {
            return true;
        }
        if !self.truncated {
            self.truncated = true;
            tracing::warn!(capacity = self.capacity, "trace buffer full, further snapshots dropped");
        }
        false
    }

    pub(crate) fn record(&mut self, snapshot: TraceSnapshot) {
        if self.has_room() {
            self.trace.push(snapshot);
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Completed output lines plus the line left open by `Sin Saltar`.
#[derive(Debug, Clone, Default)]
pub(crate) struct OutputBuffer {
    lines: Vec<String>,
    pending: Option<String>,
}

impl OutputBuffer {
    /// Append text; without `no_newline` the current line is completed.
    pub(crate) fn write(&mut self, text: &str, no_newline: bool) {
        let mut line = self.pending.take().unwrap_or_default();
        line.push_str(text);
        if no_newline {
            self.pending = Some(line);
        } else {
            self.lines.push(line);
        }
    }

    /// Complete the open line, if any.
    pub(crate) fn flush(&mut self) {
        if let Some(line) = self.pending.take() {
            self.lines.push(line);
        }
    }

    /// Completed lines plus the open one.
    pub(crate) fn visible(&self) -> Vec<String> {
        let mut lines = self.lines.clone();
        lines.extend(self.pending.iter().cloned());
        lines
    }

    pub(crate) fn into_lines(mut self) -> Vec<String> {
        self.flush();
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(step: usize) -> TraceSnapshot {
        TraceSnapshot {
            step,
            marker: "assign".into(),
            line: Some(1),
            variables: BTreeMap::new(),
            outputs: Vec::new(),
        }
    }

    #[test]
    fn test_trace_cap() {
        let mut metrics = ExecutionMetrics::new(2);
        for step in 0..5 {
            metrics.record(snapshot(step));
        }
        assert_eq!(metrics.trace.len(), 2);
        assert!(metrics.truncated);
    }

    #[test]
    fn test_sin_saltar_merges() {
        let mut output = OutputBuffer::default();
        output.write("a ", true);
        output.write("b", true);
        assert_eq!(output.visible(), vec!["a b".to_string()]);
        output.write("!", false);
        output.write("next", false);
        assert_eq!(output.into_lines(), vec!["a b!".to_string(), "next".to_string()]);
    }

    #[test]
    fn test_open_line_flushed_at_end() {
        let mut output = OutputBuffer::default();
        output.write("fin", true);
        assert_eq!(output.into_lines(), vec!["fin".to_string()]);
    }
}
