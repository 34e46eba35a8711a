use std::fmt;
use std::path::PathBuf;

/// Why a work item was skipped without being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Directory entry whose extension is outside the supported input set.
    UnsupportedExtension,
    /// Source file exceeds the configured size cap.
    FileTooLarge,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedExtension => write!(f, "unsupported extension"),
            Self::FileTooLarge => write!(f, "file exceeds size limit"),
        }
    }
}

/// Classification of a per-item failure. This set is exhaustive: unexpected
/// internal errors are folded into the phase that raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Corrupt or undecodable source content.
    Decode,
    /// Filesystem or encoder problem at the destination.
    Write,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => write!(f, "decode error"),
            Self::Write => write!(f, "write error"),
        }
    }
}

/// Terminal state of one work item.
#[derive(Debug, Clone)]
pub enum OutcomeKind {
    Converted { dest: PathBuf, bytes_written: u64 },
    Failed { kind: FailureKind, message: String },
    Skipped { reason: SkipReason },
}

/// Result of attempting one work item. Immutable once produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub source: PathBuf,
    pub kind: OutcomeKind,
}

impl Outcome {
    pub fn converted(source: PathBuf, dest: PathBuf, bytes_written: u64) -> Self {
        Self {
            source,
            kind: OutcomeKind::Converted { dest, bytes_written },
        }
    }

    pub fn failed(source: PathBuf, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            source,
            kind: OutcomeKind::Failed {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn skipped(source: PathBuf, reason: SkipReason) -> Self {
        Self {
            source,
            kind: OutcomeKind::Skipped { reason },
        }
    }

    /// Short machine-friendly tag for progress events.
    pub fn tag(&self) -> &'static str {
        match self.kind {
            OutcomeKind::Converted { .. } => "converted",
            OutcomeKind::Failed { .. } => "failed",
            OutcomeKind::Skipped { .. } => "skipped",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failed { .. })
    }
}

/// Ordered outcomes for one run plus derived counts.
///
/// Mutated only by appending outcomes while the run is in flight; read-only
/// afterwards. The invariant `total == converted + failed + skipped` holds by
/// construction since the counts are derived from the outcome list.
#[derive(Debug, Default)]
pub struct ConversionReport {
    outcomes: Vec<Outcome>,
}

impl ConversionReport {
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn converted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.kind, OutcomeKind::Converted { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.kind, OutcomeKind::Skipped { .. }))
            .count()
    }

    /// Total encoded bytes written across all converted items.
    pub fn bytes_written(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o.kind {
                OutcomeKind::Converted { bytes_written, .. } => bytes_written,
                _ => 0,
            })
            .sum()
    }

    /// Iterate over failed outcomes for detail rendering.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_counts_sum_to_total() {
        let mut report = ConversionReport::default();
        report.push(Outcome::converted(
            PathBuf::from("a.jpg"),
            PathBuf::from("a.webp"),
            1024,
        ));
        report.push(Outcome::failed(
            PathBuf::from("b.png"),
            FailureKind::Decode,
            "truncated data",
        ));
        report.push(Outcome::skipped(
            PathBuf::from("c.txt"),
            SkipReason::UnsupportedExtension,
        ));

        assert_eq!(report.total(), 3);
        assert_eq!(report.converted(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            report.total(),
            report.converted() + report.failed() + report.skipped()
        );
    }

    #[test]
    fn test_bytes_written_sums_converted_only() {
        let mut report = ConversionReport::default();
        report.push(Outcome::converted(
            PathBuf::from("a.jpg"),
            PathBuf::from("a.webp"),
            100,
        ));
        report.push(Outcome::converted(
            PathBuf::from("b.jpg"),
            PathBuf::from("b.webp"),
            200,
        ));
        report.push(Outcome::skipped(
            PathBuf::from("c.txt"),
            SkipReason::UnsupportedExtension,
        ));
        assert_eq!(report.bytes_written(), 300);
    }

    #[test]
    fn test_outcome_tags() {
        let converted =
            Outcome::converted(PathBuf::from("a.jpg"), PathBuf::from("a.webp"), 10);
        let failed = Outcome::failed(PathBuf::from("b.png"), FailureKind::Write, "disk full");
        let skipped = Outcome::skipped(PathBuf::from("c.txt"), SkipReason::FileTooLarge);

        assert_eq!(converted.tag(), "converted");
        assert_eq!(failed.tag(), "failed");
        assert_eq!(skipped.tag(), "skipped");
    }

    #[test]
    fn test_empty_report() {
        let report = ConversionReport::default();
        assert_eq!(report.total(), 0);
        assert_eq!(report.bytes_written(), 0);
        assert!(report.failures().next().is_none());
    }
}
