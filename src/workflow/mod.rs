//! 流程层（页面）
//!
//! 每个流程对应原来的一个页面：读取走缓存，写操作走 `MutationRunner`，
//! 成功后整体重新读取。
//!
//! ```text
//! workflow (列表页 / 详情页 / 登录)
//!     ↓
//! services (缓存 / 写操作编排 / 通知)
//!     ↓
//! api (每种资源的增删改查)
//!     ↓
//! infrastructure (HttpClient)
//! ```

pub mod correctness;
pub mod infinite_list;
pub mod list_flow;
pub mod login_flow;
pub mod test_detail_flow;
pub mod tests_flow;

pub use correctness::{CorrectnessChange, CorrectnessReport};
pub use infinite_list::InfiniteList;
pub use list_flow::ListFlow;
pub use login_flow::LoginFlow;
pub use test_detail_flow::TestDetailFlow;
pub use tests_flow::{TestsFlow, TopicsFlow};
