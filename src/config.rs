//! Application-level configuration loading, including the quiz catalog seed.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{dao::quiz_catalog::MemoryQuizCatalog, state::game::Question};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/quizzes.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_RUSH_BACK_CONFIG_PATH";
/// Fewest answer options a question may carry.
const MIN_OPTIONS: usize = 2;
/// Most answer options a question may carry.
const MAX_OPTIONS: usize = 4;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    quizzes: Vec<QuizSeed>,
}

#[derive(Debug, Clone, Deserialize)]
/// One quiz definition as read from the configuration file.
pub struct QuizSeed {
    /// Identifier hosts use when creating a session for this quiz.
    pub id: String,
    /// Questions of the quiz.
    pub questions: Vec<QuestionSeed>,
}

#[derive(Debug, Clone, Deserialize)]
/// One question definition as read from the configuration file.
pub struct QuestionSeed {
    /// Prompt shown to every participant.
    pub text: String,
    /// Ordered answer options (2 to 4 entries).
    pub options: Vec<String>,
    /// Index into `options` marking the correct answer.
    pub correct_option_index: usize,
    /// Seconds players have to answer.
    pub time_limit: u32,
    /// Position of the question within its quiz.
    pub order: u32,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    quizzes: Vec<QuizSeed>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to a
    /// baked-in demo quiz.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        count = app_config.quizzes.len(),
                        "loaded quiz catalog seed from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build the in-memory quiz catalog from the configured seeds.
    ///
    /// Questions with an illegal option count or an out-of-range correct
    /// option are skipped with a warning rather than rejecting the file.
    pub fn build_catalog(&self) -> MemoryQuizCatalog {
        let catalog = MemoryQuizCatalog::new();

        for quiz in &self.quizzes {
            let questions: Vec<Question> = quiz
                .questions
                .iter()
                .filter_map(|seed| {
                    if seed.options.len() < MIN_OPTIONS || seed.options.len() > MAX_OPTIONS {
                        warn!(
                            quiz = %quiz.id,
                            text = %seed.text,
                            count = seed.options.len(),
                            "skipping question with invalid option count"
                        );
                        return None;
                    }

                    if seed.correct_option_index >= seed.options.len() {
                        warn!(
                            quiz = %quiz.id,
                            text = %seed.text,
                            "skipping question with out-of-range correct option"
                        );
                        return None;
                    }

                    Some(Question {
                        id: Uuid::new_v4(),
                        text: seed.text.clone(),
                        options: seed.options.clone(),
                        correct_option_index: seed.correct_option_index,
                        time_limit: seed.time_limit,
                        order: seed.order,
                    })
                })
                .collect();

            info!(quiz = %quiz.id, count = questions.len(), "registered quiz");
            catalog.insert_quiz(quiz.id.clone(), questions);
        }

        catalog
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quizzes: vec![QuizSeed {
                id: "demo".into(),
                questions: vec![
                    QuestionSeed {
                        text: "Which planet is known as the Red Planet?".into(),
                        options: vec![
                            "Venus".into(),
                            "Mars".into(),
                            "Jupiter".into(),
                            "Mercury".into(),
                        ],
                        correct_option_index: 1,
                        time_limit: 20,
                        order: 1,
                    },
                    QuestionSeed {
                        text: "How many sides does a hexagon have?".into(),
                        options: vec!["Five".into(), "Six".into(), "Seven".into(), "Eight".into()],
                        correct_option_index: 1,
                        time_limit: 15,
                        order: 2,
                    },
                    QuestionSeed {
                        text: "Which ocean is the largest?".into(),
                        options: vec!["Atlantic".into(), "Pacific".into()],
                        correct_option_index: 1,
                        time_limit: 10,
                        order: 3,
                    },
                ],
            }],
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            quizzes: raw.quizzes,
        }
    }
}

fn resolve_config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_catalog_skips_invalid_questions() {
        let config = AppConfig {
            quizzes: vec![QuizSeed {
                id: "mixed".into(),
                questions: vec![
                    QuestionSeed {
                        text: "valid".into(),
                        options: vec!["a".into(), "b".into()],
                        correct_option_index: 0,
                        time_limit: 10,
                        order: 1,
                    },
                    QuestionSeed {
                        text: "too few options".into(),
                        options: vec!["a".into()],
                        correct_option_index: 0,
                        time_limit: 10,
                        order: 2,
                    },
                    QuestionSeed {
                        text: "correct index out of range".into(),
                        options: vec!["a".into(), "b".into(), "c".into()],
                        correct_option_index: 3,
                        time_limit: 10,
                        order: 3,
                    },
                ],
            }],
        };

        use crate::dao::quiz_catalog::QuizCatalog;
        let catalog = config.build_catalog();
        let questions = catalog.ordered_questions("mixed").await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "valid");
    }

    #[tokio::test]
    async fn default_config_seeds_the_demo_quiz() {
        use crate::dao::quiz_catalog::QuizCatalog;
        let catalog = AppConfig::default().build_catalog();
        let questions = catalog.ordered_questions("demo").await.unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| (2..=4).contains(&q.options.len())));
    }
}
