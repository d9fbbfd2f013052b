//! API 模块
//!
//! 每种资源每个动作对应一个函数，一对一映射到 REST 接口，
//! 不做批量、重试或校验。

pub mod auth;
pub mod resource;

pub use auth::{AuthApi, LoginResponse};
pub use resource::{Browsable, Resource, ResourceApi, ResourceKind};

use crate::models::{AnswerOption, Question, Test, Topic};

pub type TopicApi = ResourceApi<Topic>;
pub type TestApi = ResourceApi<Test>;
pub type QuestionApi = ResourceApi<Question>;
pub type OptionApi = ResourceApi<AnswerOption>;
