use super::domain::{points_for, rounded_mean, Domain};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Per-domain and global scores for one quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisScores {
    pub global: u8,
    pub energia: u8,
    pub son: u8,
    pub nutricio: u8,
    pub atencio: u8,
    pub temps: u8,
}

impl DiagnosisScores {
    pub fn domain(&self, domain: Domain) -> u8 {
        match domain {
            Domain::Energy => self.energia,
            Domain::Sleep => self.son,
            Domain::Nutrition => self.nutricio,
            Domain::Attention => self.atencio,
            Domain::PerceivedTime => self.temps,
        }
    }

    /// Domain scores in canonical order.
    pub fn domains(&self) -> [(Domain, u8); 5] {
        Domain::ordered().map(|domain| (domain, self.domain(domain)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemeError {
    #[error("domain {0} needs at least one question")]
    EmptyDomain(Domain),
}

/// Contiguous question ranges per domain, in canonical domain order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringScheme {
    ranges: [Range<usize>; 5],
}

impl ScoringScheme {
    /// The partition matching the authored 17-question bank.
    pub fn standard() -> Self {
        Self::layout([3, 4, 4, 3, 3])
    }

    /// Builds a scheme from question counts per domain, laid out back to back
    /// in canonical domain order. Every domain needs at least one question.
    pub fn from_counts(counts: [usize; 5]) -> Result<Self, SchemeError> {
        if let Some((domain, _)) = Domain::ordered()
            .into_iter()
            .zip(counts)
            .find(|(_, count)| *count == 0)
        {
            return Err(SchemeError::EmptyDomain(domain));
        }

        Ok(Self::layout(counts))
    }

    fn layout(counts: [usize; 5]) -> Self {
        let mut start = 0;
        let ranges = counts.map(|count| {
            let range = start..start + count;
            start += count;
            range
        });
        Self { ranges }
    }

    pub fn question_count(&self) -> usize {
        self.ranges[4].end
    }

    pub fn range(&self, domain: Domain) -> Range<usize> {
        self.ranges[domain_index(domain)].clone()
    }

    /// Domain owning the question at `index`, if the scheme covers it.
    pub fn domain_of(&self, index: usize) -> Option<Domain> {
        Domain::ordered()
            .into_iter()
            .find(|domain| self.range(*domain).contains(&index))
    }

    /// Scores an answer sequence. Missing answers are padded with the best
    /// option and surplus answers are ignored.
    pub fn compute(&self, answers: &[u8]) -> DiagnosisScores {
        let padded: Vec<u8> = (0..self.question_count())
            .map(|index| answers.get(index).copied().unwrap_or(0))
            .collect();

        let score = |domain: Domain| {
            rounded_mean(
                padded[self.range(domain)]
                    .iter()
                    .map(|answer| u32::from(points_for(*answer))),
            )
        };

        let energia = score(Domain::Energy);
        let son = score(Domain::Sleep);
        let nutricio = score(Domain::Nutrition);
        let atencio = score(Domain::Attention);
        let temps = score(Domain::PerceivedTime);
        let global = rounded_mean([energia, son, nutricio, atencio, temps].map(u32::from));

        DiagnosisScores {
            global,
            energia,
            son,
            nutricio,
            atencio,
            temps,
        }
    }
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self::standard()
    }
}

fn domain_index(domain: Domain) -> usize {
    match domain {
        Domain::Energy => 0,
        Domain::Sleep => 1,
        Domain::Nutrition => 2,
        Domain::Attention => 3,
        Domain::PerceivedTime => 4,
    }
}

/// Scores answers with the standard scheme.
pub fn compute_scores(answers: &[u8]) -> DiagnosisScores {
    ScoringScheme::standard().compute(answers)
}
