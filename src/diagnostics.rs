/// Category of a non-fatal problem encountered while authoring or measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// No material system was available; the vessel is unshaded.
    MaterialUnavailable,
    /// The material system failed while authoring or binding.
    MaterialFailed,
    /// A sub-prim could not be created.
    PrimCreationFailed,
    /// The vessel transform could not be read; world space was used.
    TransformUnavailable,
    /// No live point cloud could be read.
    PointsUnavailable,
    /// An override key is not recognized.
    UnknownOverride,
    /// An override value has the wrong type.
    InvalidOverride,
    /// The fill region is empty.
    DegenerateFill,
}

/// A single non-fatal problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Ordered collection of non-fatal problems returned next to a result.
///
/// Every pushed entry is also logged as a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem and logs it.
    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?kind, "{message}");
        self.entries.push(Diagnostic { kind, message });
    }

    /// Moves all entries of `other` into `self` without logging them again.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any entry has the given kind.
    #[must_use]
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_query() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.push(DiagnosticKind::MaterialUnavailable, "no materials");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.contains(DiagnosticKind::MaterialUnavailable));
        assert!(!diagnostics.contains(DiagnosticKind::PrimCreationFailed));
    }

    #[test]
    fn extend_keeps_order() {
        let mut a = Diagnostics::new();
        a.push(DiagnosticKind::UnknownOverride, "first");
        let mut b = Diagnostics::new();
        b.push(DiagnosticKind::DegenerateFill, "second");
        a.extend(b);
        let messages: Vec<_> = a.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
