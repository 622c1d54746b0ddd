use quiz_core::{AnswerOutcome, Performance, QuizResults};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRowVm {
    pub number: usize,
    pub question: String,
    pub status_label: &'static str,
    /// "Skipped" when the question was left unanswered.
    pub your_answer: String,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub score_label: String,
    pub percent_label: String,
    pub headline: &'static str,
    pub feedback: String,
    pub rows: Vec<SummaryRowVm>,
}

fn headline(performance: Performance) -> &'static str {
    match performance {
        Performance::Outstanding => "Outstanding Performance!",
        Performance::Good => "Good Work! Keep Learning!",
        Performance::NeedsPractice => "Keep Practicing! You'll Get Better!",
    }
}

fn status_label(outcome: AnswerOutcome) -> &'static str {
    match outcome {
        AnswerOutcome::Correct => "Correct",
        AnswerOutcome::Incorrect => "Incorrect",
        AnswerOutcome::Skipped => "Skipped",
    }
}

#[must_use]
pub fn map_summary(results: &QuizResults) -> SummaryVm {
    let rows = results
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| SummaryRowVm {
            number: idx + 1,
            question: record.question.clone(),
            status_label: status_label(record.outcome()),
            your_answer: record
                .user_answer
                .clone()
                .unwrap_or_else(|| "Skipped".to_string()),
            correct_answer: record.correct_answer.clone(),
            explanation: record.explanation.clone(),
        })
        .collect();

    SummaryVm {
        score_label: format!("{} / {}", results.score, results.total),
        percent_label: format!("({}%)", results.percentage()),
        headline: headline(results.performance()),
        feedback: results.feedback(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionId};
    use quiz_core::QuizSession;

    fn finished(answers: &[Option<&str>]) -> QuizResults {
        let questions = (0..answers.len())
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}?"),
                    vec!["right".into(), "wrong".into()],
                    "right",
                    "Because.",
                )
                .unwrap()
            })
            .collect();
        let mut session = QuizSession::new();
        session.start(questions).unwrap();
        for answer in answers {
            if let Some(answer) = answer {
                session.select_answer(*answer);
            }
            session.advance();
        }
        QuizResults::from_session(&session).unwrap()
    }

    #[test]
    fn mixed_results_render_rows() {
        let summary = map_summary(&finished(&[Some("right"), Some("wrong"), None]));

        assert_eq!(summary.score_label, "1 / 3");
        assert_eq!(summary.percent_label, "(33%)");
        assert_eq!(summary.headline, "Keep Practicing! You'll Get Better!");
        assert_eq!(summary.feedback, "You correctly answered 1 out of 3 questions.");

        let statuses: Vec<_> = summary.rows.iter().map(|r| r.status_label).collect();
        assert_eq!(statuses, vec!["Correct", "Incorrect", "Skipped"]);
        assert_eq!(summary.rows[2].your_answer, "Skipped");
        assert_eq!(summary.rows[1].correct_answer, "right");
        assert_eq!(summary.rows[0].number, 1);
    }

    #[test]
    fn headline_follows_performance_band() {
        let all = map_summary(&finished(&[Some("right"); 5]));
        assert_eq!(all.headline, "Outstanding Performance!");

        let three_of_five = map_summary(&finished(&[
            Some("right"),
            Some("right"),
            Some("right"),
            None,
            None,
        ]));
        assert_eq!(three_of_five.headline, "Good Work! Keep Learning!");
        assert_eq!(three_of_five.percent_label, "(60%)");
    }
}
