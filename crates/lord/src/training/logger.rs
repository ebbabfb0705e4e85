//! Training progress reporting.

use std::time::Instant;

/// How much a training run reports on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    #[default]
    Silent,
    Warning,
    Info,
    Debug,
}

/// Phase-oriented logger for a single training run.
///
/// Messages below the configured verbosity are dropped. Phase timings are
/// measured from the previous phase boundary.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
    last_phase: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
            last_phase: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start_training(&mut self, n_rows: usize, n_selectors: usize) {
        let now = Instant::now();
        self.started = Some(now);
        self.last_phase = Some(now);
        if self.enabled(Verbosity::Info) {
            eprintln!("[lord] training on {n_rows} rows, {n_selectors} selectors");
        }
    }

    /// Mark the end of a phase, e.g. tree construction or rule search.
    pub fn log_phase(&mut self, phase: &str, detail: impl std::fmt::Display) {
        let now = Instant::now();
        let elapsed = self.last_phase.map(|t| now.duration_since(t));
        self.last_phase = Some(now);
        if self.enabled(Verbosity::Info) {
            match elapsed {
                Some(d) => eprintln!("[lord] {phase}: {detail} ({:.3}s)", d.as_secs_f64()),
                None => eprintln!("[lord] {phase}: {detail}"),
            }
        }
    }

    pub fn warn(&self, message: impl std::fmt::Display) {
        if self.enabled(Verbosity::Warning) {
            eprintln!("[lord] warning: {message}");
        }
    }

    pub fn debug(&self, message: impl std::fmt::Display) {
        if self.enabled(Verbosity::Debug) {
            eprintln!("[lord] {message}");
        }
    }

    pub fn finish_training(&mut self, n_rules: usize) {
        if self.enabled(Verbosity::Info) {
            match self.started.take() {
                Some(t) => eprintln!(
                    "[lord] done: {n_rules} rules in {:.3}s",
                    t.elapsed().as_secs_f64()
                ),
                None => eprintln!("[lord] done: {n_rules} rules"),
            }
        }
        self.last_phase = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Debug > Verbosity::Info);
        assert!(Verbosity::Info > Verbosity::Warning);
        assert!(Verbosity::Warning > Verbosity::Silent);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn test_enabled_levels() {
        let logger = TrainingLogger::new(Verbosity::Info);
        assert!(logger.enabled(Verbosity::Warning));
        assert!(logger.enabled(Verbosity::Info));
        assert!(!logger.enabled(Verbosity::Debug));
        assert!(!logger.enabled(Verbosity::Silent));

        let silent = TrainingLogger::new(Verbosity::Silent);
        assert!(!silent.enabled(Verbosity::Warning));
    }

    #[test]
    fn test_phase_cycle_without_output() {
        let mut logger = TrainingLogger::new(Verbosity::Silent);
        logger.start_training(10, 4);
        logger.log_phase("tree", "12 nodes");
        logger.finish_training(3);
        assert!(logger.started.is_none());
    }
}
