pub mod difficulty;
pub mod option;
pub mod pagination;
pub mod question;
pub mod topic;

pub use difficulty::DifficultyLevel;
pub use option::{AnswerOption, OptionDraft, OptionPatch};
pub use pagination::{PageResult, PaginationOptions};
pub use question::{Question, QuestionDraft, QuestionPatch};
pub use test::{Test, TestDraft, TestPatch};
pub use topic::{Topic, TopicDraft, TopicPatch};

/// 服务端分配的记录 ID
pub type RecordId = i64;
