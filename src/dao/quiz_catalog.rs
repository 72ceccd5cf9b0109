use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::{dao::storage::StorageResult, state::game::Question};

/// Read-only catalog resolving a quiz id to its ordered question list.
///
/// Question authoring lives outside this service; the engine only ever asks
/// for the questions of one quiz, sorted ascending by their `order` field.
pub trait QuizCatalog: Send + Sync {
    /// Questions of `quiz_id` ordered ascending by `order`.
    ///
    /// Unknown quiz ids resolve to an empty list rather than an error.
    fn ordered_questions(&self, quiz_id: &str) -> BoxFuture<'static, StorageResult<Vec<Question>>>;
}

/// In-process [`QuizCatalog`] seeded at startup from configuration.
#[derive(Debug, Default)]
pub struct MemoryQuizCatalog {
    quizzes: DashMap<String, Vec<Question>>,
}

impl MemoryQuizCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a quiz, sorting its questions ascending by `order`.
    pub fn insert_quiz(&self, quiz_id: impl Into<String>, mut questions: Vec<Question>) {
        questions.sort_by_key(|question| question.order);
        self.quizzes.insert(quiz_id.into(), questions);
    }
}

impl QuizCatalog for MemoryQuizCatalog {
    fn ordered_questions(&self, quiz_id: &str) -> BoxFuture<'static, StorageResult<Vec<Question>>> {
        let questions = self
            .quizzes
            .get(quiz_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        Box::pin(async move { Ok(questions) })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn question(text: &str, order: u32) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: text.into(),
            options: vec!["a".into(), "b".into()],
            correct_option_index: 0,
            time_limit: 10,
            order,
        }
    }

    #[tokio::test]
    async fn unknown_quiz_resolves_to_empty_list() {
        let catalog = MemoryQuizCatalog::new();
        assert!(catalog.ordered_questions("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn questions_come_back_sorted_by_order() {
        let catalog = MemoryQuizCatalog::new();
        catalog.insert_quiz(
            "q1",
            vec![question("second", 2), question("first", 1), question("third", 3)],
        );

        let questions = catalog.ordered_questions("q1").await.unwrap();
        let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}
