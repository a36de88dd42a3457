use super::domain::Domain;
use super::scoring::DiagnosisScores;
use serde::Serialize;

/// The set of domains eligible to become the accelerator, in tie-break order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceleratorPolicy {
    domains: Vec<Domain>,
}

impl AcceleratorPolicy {
    /// Duplicates are dropped, keeping first occurrence. An empty list scans
    /// every domain in canonical order.
    pub fn new(domains: Vec<Domain>) -> Self {
        let mut unique = Vec::with_capacity(domains.len());
        for domain in domains {
            if !unique.contains(&domain) {
                unique.push(domain);
            }
        }

        if unique.is_empty() {
            return Self::default();
        }

        Self { domains: unique }
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Lowest-scoring scanned domain; the first one wins ties.
    pub fn select(&self, scores: &DiagnosisScores) -> Domain {
        let mut selected = self.domains[0];
        let mut lowest = scores.domain(selected);

        for domain in &self.domains[1..] {
            let score = scores.domain(*domain);
            if score < lowest {
                selected = *domain;
                lowest = score;
            }
        }

        selected
    }
}

impl Default for AcceleratorPolicy {
    fn default() -> Self {
        Self {
            domains: Domain::ordered().to_vec(),
        }
    }
}

/// Selects the accelerator with the default all-domain policy.
pub fn select_accelerator(scores: &DiagnosisScores) -> Domain {
    AcceleratorPolicy::default().select(scores)
}
