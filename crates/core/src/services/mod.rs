//! Business logic services.

#![allow(missing_docs)]

pub mod answer;
pub mod api_key;
pub mod multi_question;
pub mod question;
pub mod user_answer;

pub use answer::{AnswerService, CreateAnswerInput};
pub use api_key::{ApiKeyService, IssueApiKeyInput, IssuedApiKey, hash_secret};
pub use multi_question::{
    CreateMultiQuestionInput, CreatedGroup, GroupWithMembers, MultiQuestionService,
};
pub use question::{
    CreateQuestionInput, CreateQuestionWithAnswersInput, CreateUrlInput, DATE_FORMAT,
    QuestionService, UpdateQuestionInput, ValidatedQuestion,
};
pub use user_answer::{UserAnswerInput, UserAnswerService};
