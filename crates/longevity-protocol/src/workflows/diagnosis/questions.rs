use super::domain::{Domain, POINTS};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub index: usize,
    pub domain: Domain,
    pub prompt: &'static str,
    /// Ordered best to worst; option `i` is worth `POINTS[i]`.
    pub options: [&'static str; 4],
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOptionView {
    pub index: u8,
    pub label: &'static str,
    pub points: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestionView {
    pub index: usize,
    pub domain: Domain,
    pub domain_label: &'static str,
    pub prompt: &'static str,
    pub options: Vec<QuizOptionView>,
}

impl QuizQuestion {
    pub fn to_view(&self) -> QuizQuestionView {
        QuizQuestionView {
            index: self.index,
            domain: self.domain,
            domain_label: self.domain.label(),
            prompt: self.prompt,
            options: self
                .options
                .into_iter()
                .zip(POINTS)
                .enumerate()
                .map(|(index, (label, points))| QuizOptionView {
                    index: index as u8,
                    label,
                    points,
                })
                .collect(),
        }
    }
}

/// The authored quiz, grouped by domain in the order the standard scoring
/// scheme expects.
pub fn question_bank() -> Vec<QuizQuestion> {
    let authored: [(Domain, &'static str, [&'static str; 4]); 17] = [
        (
            Domain::Energy,
            "How often do you wake up feeling rested and ready for the day?",
            ["Almost always", "Most days", "Rarely", "Almost never"],
        ),
        (
            Domain::Energy,
            "Do you hit an energy slump in the afternoon?",
            ["Never", "Once or twice a week", "Most days", "Every day"],
        ),
        (
            Domain::Energy,
            "How much caffeine do you need to get through the day?",
            ["None", "One cup", "Two or three cups", "More than three cups"],
        ),
        (
            Domain::Sleep,
            "How many hours do you usually sleep?",
            ["7 to 9 hours", "6 to 7 hours", "5 to 6 hours", "Less than 5 hours"],
        ),
        (
            Domain::Sleep,
            "How consistent are your bed and wake times, weekends included?",
            [
                "Within 30 minutes",
                "Within an hour",
                "Within two hours",
                "No fixed schedule",
            ],
        ),
        (
            Domain::Sleep,
            "How often do you wake up during the night?",
            ["Rarely", "Once a night", "Two or three times", "More than three times"],
        ),
        (
            Domain::Sleep,
            "Do you look at screens in the hour before bed?",
            ["Never", "Sometimes", "Most nights", "Every night"],
        ),
        (
            Domain::Nutrition,
            "How many portions of vegetables and fruit do you eat per day?",
            ["Five or more", "Three or four", "One or two", "Hardly any"],
        ),
        (
            Domain::Nutrition,
            "How often do you eat ultra-processed food?",
            ["Rarely", "A few times a week", "Once a day", "Several times a day"],
        ),
        (
            Domain::Nutrition,
            "How much water do you drink per day?",
            [
                "Two litres or more",
                "About one and a half litres",
                "About one litre",
                "Less than one litre",
            ],
        ),
        (
            Domain::Nutrition,
            "How often do you eat late at night?",
            ["Never", "Once a week", "Several times a week", "Every night"],
        ),
        (
            Domain::Attention,
            "How long can you focus on one task without checking your phone?",
            [
                "More than an hour",
                "30 to 60 minutes",
                "10 to 30 minutes",
                "Less than 10 minutes",
            ],
        ),
        (
            Domain::Attention,
            "How often do you lose track of what you were doing?",
            ["Rarely", "Sometimes", "Often", "Constantly"],
        ),
        (
            Domain::Attention,
            "How many hours a day do you spend on social media?",
            [
                "Less than 30 minutes",
                "30 to 60 minutes",
                "One to three hours",
                "More than three hours",
            ],
        ),
        (
            Domain::PerceivedTime,
            "Do you feel your days fly by without you noticing?",
            ["Never", "Sometimes", "Often", "Always"],
        ),
        (
            Domain::PerceivedTime,
            "How often do you have time for things you enjoy?",
            ["Every day", "A few times a week", "Once a week", "Hardly ever"],
        ),
        (
            Domain::PerceivedTime,
            "How rushed do you feel during a typical day?",
            ["Not at all", "A little", "Quite a lot", "Constantly"],
        ),
    ];

    authored
        .into_iter()
        .enumerate()
        .map(|(index, (domain, prompt, options))| QuizQuestion {
            index,
            domain,
            prompt,
            options,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::diagnosis::domain::QUESTION_COUNT;
    use crate::workflows::diagnosis::scoring::ScoringScheme;

    #[test]
    fn bank_agrees_with_standard_partition() {
        let scheme = ScoringScheme::standard();
        let bank = question_bank();
        assert_eq!(bank.len(), QUESTION_COUNT);
        for question in &bank {
            assert_eq!(
                scheme.domain_of(question.index),
                Some(question.domain),
                "question {} sits outside its domain range",
                question.index
            );
        }
    }

    #[test]
    fn view_pairs_options_with_points() {
        let view = question_bank()[3].to_view();
        assert_eq!(view.domain_label, "Sleep");
        let points: Vec<u8> = view.options.iter().map(|option| option.points).collect();
        assert_eq!(points, vec![100, 70, 40, 20]);
    }
}
