//! Field-name to value maps for API responses and logging.
//!
//! Each entity lists its own fields through a [`RecordBuilder`]; nothing is
//! discovered at runtime. Foreign keys appear under the relation name
//! (`api_key`, `question`, ...) holding the raw key.

use quescheetah_db::entities::{answer, api_key, multi_question, question, url, user_answer};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use serde_json::{Map, Value};

/// A field-name to JSON value map.
pub type Record = Map<String, Value>;

/// Types that can be rendered as a [`Record`].
pub trait ToRecord {
    /// Build the record. Two calls on an unchanged value yield equal maps.
    fn to_record(&self) -> Record;
}

/// Builds a [`Record`] one field at a time.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    persisted: bool,
    fields: Record,
}

impl RecordBuilder {
    /// Start a record keyed by `id`, or by `None` for an unsaved instance.
    #[must_use]
    pub fn new(id: Option<&str>) -> Self {
        let mut fields = Record::new();
        fields.insert("id".to_string(), id.map_or(Value::Null, Value::from));
        Self {
            persisted: id.is_some_and(|id| !id.is_empty()),
            fields,
        }
    }

    /// Add a plain value.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Add a timestamp as an RFC 3339 string.
    #[must_use]
    pub fn timestamp(self, name: &str, value: &DateTimeWithTimeZone) -> Self {
        let rendered = value.to_rfc3339();
        self.field(name, rendered)
    }

    /// Add a list of related primary keys.
    ///
    /// `ids` is only called for a persisted instance; an unsaved one gets an
    /// empty list.
    #[must_use]
    pub fn related<F>(mut self, name: &str, ids: F) -> Self
    where
        F: FnOnce() -> Vec<String>,
    {
        let ids = if self.persisted { ids() } else { Vec::new() };
        self.fields.insert(
            name.to_string(),
            Value::Array(ids.into_iter().map(Value::from).collect()),
        );
        self
    }

    /// Finish the record.
    #[must_use]
    pub fn build(self) -> Record {
        self.fields
    }
}

impl ToRecord for api_key::Model {
    fn to_record(&self) -> Record {
        RecordBuilder::new(Some(&self.id))
            .field("name", &self.name)
            .timestamp("created_dt", &self.created_dt)
            .timestamp("updated_dt", &self.updated_dt)
            .build()
    }
}

impl ToRecord for question::Model {
    fn to_record(&self) -> Record {
        RecordBuilder::new(Some(&self.id))
            .field("api_key", &self.api_key_id)
            .field("type", self.question_type.as_code())
            .field("multi_question", &self.multi_question_id)
            .field("question_title", &self.question_title)
            .field("question_text", &self.question_text)
            .field("is_closed", self.is_closed)
            .timestamp("start_dt", &self.start_dt)
            .timestamp("end_dt", &self.end_dt)
            .field("is_editable", self.is_editable)
            .field("is_private", self.is_private)
            .timestamp("created_dt", &self.created_dt)
            .timestamp("updated_dt", &self.updated_dt)
            .build()
    }
}

impl ToRecord for url::Model {
    fn to_record(&self) -> Record {
        RecordBuilder::new(Some(&self.id))
            .field("question", &self.question_id)
            .field("url_name", &self.url_name)
            .field("full_url", &self.full_url)
            .timestamp("created_dt", &self.created_dt)
            .timestamp("updated_dt", &self.updated_dt)
            .build()
    }
}

impl ToRecord for answer::Model {
    fn to_record(&self) -> Record {
        RecordBuilder::new(Some(&self.id))
            .field("question", &self.question_id)
            .field("answer_text", &self.answer_text)
            .field("answer_num", self.answer_num)
            .timestamp("created_dt", &self.created_dt)
            .timestamp("updated_dt", &self.updated_dt)
            .build()
    }
}

impl ToRecord for user_answer::Model {
    fn to_record(&self) -> Record {
        RecordBuilder::new(Some(&self.id))
            .field("answer", &self.answer_id)
            .field("question", &self.question_id)
            .field("unique_user", &self.unique_user)
            .timestamp("created_dt", &self.created_dt)
            .timestamp("updated_dt", &self.updated_dt)
            .build()
    }
}

/// A group together with the IDs of its member questions.
#[derive(Debug, Clone)]
pub struct MultiQuestionRecord<'a> {
    /// The group row.
    pub group: &'a multi_question::Model,
    /// Member questions, in creation order.
    pub question_elements: &'a [question::Model],
}

impl ToRecord for MultiQuestionRecord<'_> {
    fn to_record(&self) -> Record {
        RecordBuilder::new(Some(&self.group.id))
            .field("api_key", &self.group.api_key_id)
            .field("group_name", &self.group.group_name)
            .timestamp("created_dt", &self.group.created_dt)
            .timestamp("updated_dt", &self.group.updated_dt)
            .related("question_elements", || {
                self.question_elements.iter().map(|q| q.id.clone()).collect()
            })
            .build()
    }
}

/// An answer with its current response count.
#[derive(Debug, Clone)]
pub struct AnswerWithCount {
    /// The answer row.
    pub answer: answer::Model,
    /// Number of user answers that picked it.
    pub answer_count: u64,
}

impl ToRecord for AnswerWithCount {
    fn to_record(&self) -> Record {
        let mut record = self.answer.to_record();
        record.insert("answer_count".to_string(), Value::from(self.answer_count));
        record
    }
}

/// A question with its answers and access URLs.
#[derive(Debug, Clone)]
pub struct QuestionDetail {
    /// The question row.
    pub question: question::Model,
    /// Its answers with counts.
    pub answers: Vec<AnswerWithCount>,
    /// Access URLs registered for it.
    pub urls: Vec<url::Model>,
}

impl ToRecord for QuestionDetail {
    fn to_record(&self) -> Record {
        let mut record = self.question.to_record();
        record.insert("answers".to_string(), records(&self.answers));
        record.insert("urls".to_string(), records(&self.urls));
        record
    }
}

/// Render a slice as a JSON array of records.
pub fn records<T: ToRecord>(items: &[T]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| Value::Object(item.to_record()))
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use quescheetah_db::entities::question::QuestionType;
    use serde_json::json;

    fn at(hour: u32) -> DateTimeWithTimeZone {
        Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap().into()
    }

    fn test_question(id: &str) -> question::Model {
        question::Model {
            id: id.to_string(),
            api_key_id: "k1".to_string(),
            question_type: QuestionType::Survey,
            multi_question_id: Some("g1".to_string()),
            question_title: "Lunch".to_string(),
            question_text: "What should we eat?".to_string(),
            is_closed: false,
            start_dt: at(10),
            end_dt: at(11),
            is_editable: true,
            is_private: false,
            created_dt: at(8),
            updated_dt: at(8),
        }
    }

    #[test]
    fn test_question_record_fields() {
        let record = test_question("q1").to_record();

        assert_eq!(record["id"], json!("q1"));
        assert_eq!(record["api_key"], json!("k1"));
        assert_eq!(record["type"], json!("SURV"));
        assert_eq!(record["multi_question"], json!("g1"));
        assert_eq!(record["start_dt"], json!("2020-01-01T10:00:00+00:00"));
        assert_eq!(record["is_editable"], json!(true));
        assert_eq!(record.len(), 13);
    }

    #[test]
    fn test_record_is_deterministic() {
        let question = test_question("q1");
        assert_eq!(question.to_record(), question.to_record());
    }

    #[test]
    fn test_answer_record_keeps_null_number() {
        let answer = answer::Model {
            id: "a1".to_string(),
            question_id: "q1".to_string(),
            answer_text: "Pizza".to_string(),
            answer_num: None,
            created_dt: at(8),
            updated_dt: at(9),
        };
        let record = answer.to_record();

        assert_eq!(record["question"], json!("q1"));
        assert_eq!(record["answer_num"], Value::Null);
    }

    #[test]
    fn test_api_key_record_omits_hash() {
        let key = api_key::Model {
            id: "k1".to_string(),
            name: "owner".to_string(),
            key_hash: "deadbeef".to_string(),
            created_dt: at(8),
            updated_dt: at(8),
        };
        let record = key.to_record();

        assert!(!record.contains_key("key_hash"));
        assert!(
            !serde_json::to_string(&record)
                .unwrap()
                .contains("deadbeef")
        );
    }

    #[test]
    fn test_group_record_lists_member_ids() {
        let group = multi_question::Model {
            id: "g1".to_string(),
            api_key_id: "k1".to_string(),
            group_name: "Weekly".to_string(),
            created_dt: at(8),
            updated_dt: at(8),
        };
        let members = vec![test_question("q1"), test_question("q2")];
        let record = MultiQuestionRecord {
            group: &group,
            question_elements: &members,
        }
        .to_record();

        assert_eq!(record["question_elements"], json!(["q1", "q2"]));
        assert_eq!(record["group_name"], json!("Weekly"));
    }

    #[test]
    fn test_unsaved_instance_has_empty_relations_without_lookup() {
        let record = RecordBuilder::new(None)
            .field("group_name", "draft")
            .related("question_elements", || panic!("lookup on unsaved instance"))
            .build();

        assert_eq!(record["id"], Value::Null);
        assert_eq!(record["question_elements"], json!([]));
    }

    #[test]
    fn test_question_detail_nests_answers_with_counts() {
        let answer = answer::Model {
            id: "a1".to_string(),
            question_id: "q1".to_string(),
            answer_text: "Pizza".to_string(),
            answer_num: Some(1),
            created_dt: at(8),
            updated_dt: at(8),
        };
        let detail = QuestionDetail {
            question: test_question("q1"),
            answers: vec![AnswerWithCount {
                answer,
                answer_count: 3,
            }],
            urls: Vec::new(),
        };
        let record = detail.to_record();

        assert_eq!(record["answers"][0]["answer_count"], json!(3));
        assert_eq!(record["answers"][0]["answer_text"], json!("Pizza"));
        assert_eq!(record["urls"], json!([]));
        assert_eq!(record["question_title"], json!("Lunch"));
    }
}
