//! First-match rule classification
//!
//! An ordered list of `(predicate, label)` rules evaluated in sequence; the
//! first predicate that holds wins, and a fallback label catches the rest.
//! Overlapping predicates are resolved purely by rule order.

use std::fmt;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct Rule<T, L> {
    label: L,
    predicate: Predicate<T>,
}

/// Ordered first-match classifier over items `T` producing labels `L`
pub struct Classifier<T, L = String> {
    rules: Vec<Rule<T, L>>,
    fallback: L,
}

impl<T, L> Classifier<T, L> {
    /// Create a classifier with only a fallback label
    pub fn new(fallback: impl Into<L>) -> Self {
        Self {
            rules: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Append a rule; rules are tried in insertion order
    #[must_use]
    pub fn rule<F>(mut self, label: impl Into<L>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            label: label.into(),
            predicate: Box::new(predicate),
        });
        self
    }

    /// Label of the first matching rule, or the fallback
    pub fn classify(&self, item: &T) -> &L {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(item))
            .map_or(&self.fallback, |rule| &rule.label)
    }

    /// All labels in rule order, fallback last
    pub fn labels(&self) -> Vec<&L> {
        self.rules
            .iter()
            .map(|r| &r.label)
            .chain(std::iter::once(&self.fallback))
            .collect()
    }

    /// Position of a label in rule order
    pub fn rank<Q>(&self, label: &Q) -> usize
    where
        Q: ?Sized,
        L: PartialEq<Q>,
    {
        self.labels()
            .iter()
            .position(|&l| l == label)
            .unwrap_or(usize::MAX)
    }
}

impl<T, L: fmt::Debug> fmt::Debug for Classifier<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("rules", &self.rules.iter().map(|r| &r.label).collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}
