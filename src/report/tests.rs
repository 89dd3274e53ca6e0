use super::*;
use crate::error::{AppError, AppResult, ValidationError};
use crate::executor::Outcome;
use crate::metrics::{Snapshot, StatusHistogram};
use crate::shutdown::StopFlag;

#[test]
fn progress_line_matches_expected_layout() -> AppResult<()> {
    let snapshot = Snapshot {
        completed: 1_000,
        failures: 3,
        bytes: 50_000,
        elapsed: Duration::from_millis(2_500),
    };
    let line = format_progress_line(10, &snapshot);
    let expected = "threads 10, reqs 1000 (400 reqs/s avg), TX 50000 (20000 bytes/s avg), fails 3, 2.50 secs";
    if line != expected {
        return Err(AppError::validation(format!("Unexpected line: {}", line)));
    }
    Ok(())
}

#[test]
fn progress_line_before_start_reports_zero_rates() -> AppResult<()> {
    let snapshot = Snapshot {
        completed: 0,
        failures: 0,
        bytes: 0,
        elapsed: Duration::ZERO,
    };
    let line = format_progress_line(1, &snapshot);
    if !line.contains("(0 reqs/s avg)") || !line.ends_with("0.00 secs") {
        return Err(AppError::validation(format!("Unexpected line: {}", line)));
    }
    Ok(())
}

#[test]
fn breakdown_lists_codes_in_arrival_order_with_shares() -> AppResult<()> {
    let mut histogram = StatusHistogram::with_capacity(4);
    for code in [500, 200, 200, 200] {
        histogram.record(code).map_err(AppError::metrics)?;
    }
    let text = format_status_breakdown(&histogram, 4);
    let expected = "\nHTTP responses:\n  HTTP 500: 1 (25.00%)\n  HTTP 200: 3 (75.00%)\n";
    if text != expected {
        return Err(AppError::validation(format!("Unexpected breakdown: {:?}", text)));
    }
    Ok(())
}

#[test]
fn reporter_exits_when_run_stops() -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(async {
        let aggregator = Arc::new(Aggregator::new(1, 10, false, StopFlag::new()));
        let handle = setup_progress_reporter(Arc::clone(&aggregator), 1);

        aggregator.record(Outcome::Success {
            status: 200,
            bytes: 1,
        });
        aggregator.record(Outcome::Success {
            status: 200,
            bytes: 1,
        });

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .map_err(|err| {
                AppError::validation(format!("Reporter did not stop: {}", err))
            })??;
        Ok::<(), AppError>(())
    })
}

#[test]
fn final_report_renders_json_summary() -> AppResult<()> {
    let aggregator = Aggregator::new(5, 10, false, StopFlag::new());
    for status in [200, 200, 404] {
        aggregator.record(Outcome::Success { status, bytes: 10 });
    }
    let rendered = render_final_report(&aggregator, 2, true, true)?;
    let value: serde_json::Value = serde_json::from_str(&rendered)?;

    let checks = [
        (value["workers"] == 2, "Unexpected workers"),
        (value["completed"] == 3, "Unexpected completed"),
        (value["failures"] == 0, "Unexpected failures"),
        (value["bytes"] == 30, "Unexpected bytes"),
        (value["statuses"][0]["code"] == 200, "Expected 200 first"),
        (value["statuses"][0]["count"] == 2, "Unexpected 200 count"),
        (value["statuses"][1]["code"] == 404, "Expected 404 second"),
        (value["fatal_error"].is_null(), "Unexpected fatal error"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(format!("{}: {}", message, rendered)));
        }
    }
    Ok(())
}

#[test]
fn final_report_text_appends_breakdown_when_verbose() -> AppResult<()> {
    let aggregator = Aggregator::new(5, 10, false, StopFlag::new());
    aggregator.record(Outcome::Success {
        status: 200,
        bytes: 10,
    });

    let quiet = render_final_report(&aggregator, 1, false, false)?;
    let expected_line = "threads 1, reqs 1 (0 reqs/s avg), TX 10 (0 bytes/s avg), fails 0, 0.00 secs\n";
    if quiet != expected_line {
        return Err(AppError::validation(format!("Unexpected report: {:?}", quiet)));
    }

    let verbose = render_final_report(&aggregator, 1, true, false)?;
    let expected = format!("{}\nHTTP responses:\n  HTTP 200: 1 (100.00%)\n", expected_line);
    if verbose != expected {
        return Err(AppError::validation(format!("Unexpected report: {:?}", verbose)));
    }
    Ok(())
}
