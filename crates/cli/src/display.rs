// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rinse_core::{QueuedAction, QueueSummary};

use crate::sync::{SkipReason, SyncReport};

/// Format one queued action for list output.
///
/// ```text
/// 1700000000000-k3j9x0a1b  [pending]  POST /orders  (2023-11-14 22:13:20, retries 0)
/// ```
pub fn format_action_line(action: &QueuedAction) -> String {
    let created = action
        .created_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| action.timestamp.to_string());
    format!(
        "{}  [{}]  {} {}  ({}, retries {})",
        action.id, action.status, action.method, action.endpoint, created, action.retries
    )
}

/// Multi-line summary used by `rinse status`.
pub fn format_summary(summary: &QueueSummary, base_url: &str) -> Vec<String> {
    vec![
        format!("Backend: {}", base_url),
        format!("Queued: {}", summary.total),
        format!("  pending: {}", summary.pending),
        format!("  processing: {}", summary.processing),
        format!("  failed: {}", summary.failed),
    ]
}

/// One-line outcome of a sync pass.
pub fn format_report(report: &SyncReport) -> String {
    let mut line = match report.skipped {
        Some(SkipReason::Offline) => return "Skipped: offline".to_string(),
        Some(SkipReason::AlreadySyncing) => return "Skipped: sync already in progress".to_string(),
        Some(SkipReason::Locked) => return "Skipped: queue storage is locked".to_string(),
        None if report.attempted == 0 => "Nothing to sync".to_string(),
        None => format!(
            "Synced {} of {} action(s)",
            report.succeeded, report.attempted
        ),
    };
    if report.retried > 0 {
        line.push_str(&format!(", {} will be retried", report.retried));
    }
    if report.failed > 0 {
        line.push_str(&format!(", {} failed permanently", report.failed));
    }
    if report.unsaved {
        line.push_str(" (warning: queue could not be saved)");
    }
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
