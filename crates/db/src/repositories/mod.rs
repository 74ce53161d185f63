//! Repository layer for database operations.

mod answer;
mod api_key;
mod multi_question;
mod question;
mod url;
mod user_answer;

pub use answer::AnswerRepository;
pub use api_key::ApiKeyRepository;
pub use multi_question::MultiQuestionRepository;
pub use question::QuestionRepository;
pub use url::UrlRepository;
pub use user_answer::UserAnswerRepository;
