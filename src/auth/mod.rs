//! 认证模块
//!
//! - `session` - 会话对象与 chat_id 存储（浏览器本地存储的对应物）
//! - `guard` - 路由守卫：有会话即视为已登录，不再向服务端复核

pub mod guard;
pub mod session;

pub use guard::{follow, resolve, Navigation, Route};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
