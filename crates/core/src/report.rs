use tracing::{error, info, warn};

use crate::model::{Condition, QualityStatus};

/// Logs one line per condition, in order, and returns how many are in `ERROR`.
///
/// The count is informational; the overall gate status alone decides
/// whether the build fails.
pub fn report_conditions(conditions: &[Condition]) -> usize {
    let mut errors = 0;
    for condition in conditions {
        let line = describe_condition(condition);
        match condition.status {
            QualityStatus::Error => {
                errors += 1;
                error!(metric = %condition.metric_key, "{line}");
            }
            QualityStatus::Warn => warn!(metric = %condition.metric_key, "{line}"),
            QualityStatus::Ok | QualityStatus::None => {
                info!(metric = %condition.metric_key, "{line}")
            }
        }
    }
    errors
}

/// Renders a condition as e.g. `ERROR coverage: 41.2 < 80 (error threshold)`.
pub fn describe_condition(condition: &Condition) -> String {
    let mut line = format!(
        "{} {}: {} {}",
        condition.status,
        condition.metric_key,
        condition.actual_value.as_deref().unwrap_or("n/a"),
        condition.comparator.symbol(),
    );

    let thresholds = [
        (condition.error_threshold.as_deref(), "error"),
        (condition.warning_threshold.as_deref(), "warning"),
    ];
    let mut sep = " ";
    let mut any = false;
    for (value, kind) in thresholds {
        if let Some(value) = value {
            line.push_str(&format!("{sep}{value} ({kind} threshold)"));
            sep = ", ";
            any = true;
        }
    }
    if !any {
        line.push_str(" (no threshold)");
    }
    line
}
