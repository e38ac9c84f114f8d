use crate::domain::constants::LOG_FILENAME;
use crate::domain::models::{Issue, RunConfig};
use std::io::Write;
use std::path::Path;

/// Print and log every issue whose severity is at least `threshold`.
///
/// With a `base_dir`, any previous `error.log` there is removed and a fresh
/// one receives the same lines. Returns how many issues passed the threshold.
pub fn log_errors(
    issues: &[Issue],
    base_dir: Option<&Path>,
    threshold: u8,
    config: &RunConfig,
) -> anyhow::Result<usize> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    log_errors_to(&mut out, issues, base_dir, threshold, config)
}

pub fn log_errors_to<W: Write>(
    out: &mut W,
    issues: &[Issue],
    base_dir: Option<&Path>,
    threshold: u8,
    config: &RunConfig,
) -> anyhow::Result<usize> {
    let mut log_file = match base_dir {
        Some(dir) => {
            let path = dir.join(LOG_FILENAME);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            Some(std::fs::File::create(&path)?)
        }
        None => None,
    };

    let mut logged = 0usize;
    for issue in issues.iter().filter(|i| i.severity.level() >= threshold) {
        let line = issue.to_string();
        if !config.quiet {
            writeln!(out, "{}", line)?;
        }
        if let Some(f) = log_file.as_mut() {
            writeln!(f, "{}", line)?;
        }
        logged += 1;
    }
    tracing::debug!(logged, total = issues.len(), threshold, "issues reported");
    Ok(logged)
}

/// Issues that count as errors or warnings in command summaries.
pub fn count_problems(issues: &[Issue]) -> usize {
    issues.iter().filter(|i| i.severity.is_problem()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Severity;
    use tempfile::TempDir;

    fn sample() -> Vec<Issue> {
        vec![
            Issue::critical("broken"),
            Issue::warning("odd"),
            Issue::info("custom field"),
        ]
    }

    #[test]
    fn filters_by_threshold_on_stdout_and_file() {
        let tmp = TempDir::new().unwrap();
        let mut out = Vec::new();
        let n = log_errors_to(
            &mut out,
            &sample(),
            Some(tmp.path()),
            Severity::Warning.level(),
            &RunConfig::default(),
        )
        .unwrap();

        assert_eq!(n, 2);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, "CRITICAL: broken\nWARNING: odd\n");
        let logged = std::fs::read_to_string(tmp.path().join("error.log")).unwrap();
        assert_eq!(logged, printed);
    }

    #[test]
    fn replaces_previous_log() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("error.log");
        std::fs::write(&log, "ERROR: stale entry\n").unwrap();

        let mut out = Vec::new();
        log_errors_to(
            &mut out,
            &[Issue::error("fresh")],
            Some(tmp.path()),
            0,
            &RunConfig::default(),
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(&log).unwrap(), "ERROR: fresh\n");
    }

    #[test]
    fn quiet_still_writes_the_log() {
        let tmp = TempDir::new().unwrap();
        let mut out = Vec::new();
        let quiet = RunConfig {
            quiet: true,
            verbosity: 0,
        };
        log_errors_to(&mut out, &sample(), Some(tmp.path()), 0, &quiet).unwrap();

        assert!(out.is_empty());
        let logged = std::fs::read_to_string(tmp.path().join("error.log")).unwrap();
        assert_eq!(logged.lines().count(), 3);
    }

    #[test]
    fn without_base_dir_nothing_is_written() {
        let tmp = TempDir::new().unwrap();
        let mut out = Vec::new();
        let n = log_errors_to(&mut out, &sample(), None, 50, &RunConfig::default()).unwrap();
        assert_eq!(n, 1);
        assert!(!tmp.path().join("error.log").exists());
    }

    #[test]
    fn counts_only_problems() {
        assert_eq!(count_problems(&sample()), 2);
    }
}
