//! Database entities.

#![allow(missing_docs)]

pub mod answer;
pub mod api_key;
pub mod multi_question;
pub mod question;
pub mod url;
pub mod user_answer;

pub use answer::Entity as Answer;
pub use api_key::Entity as ApiKey;
pub use multi_question::Entity as MultiQuestion;
pub use question::Entity as Question;
pub use url::Entity as Url;
pub use user_answer::Entity as UserAnswer;
