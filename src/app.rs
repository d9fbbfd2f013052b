//! 应用装配 - 编排层
//!
//! 负责把配置、会话存储、HTTP 客户端、缓存和通知装配在一起，
//! 并按路由守卫把路径解析成要展示的数据。

use crate::api::{AuthApi, OptionApi, QuestionApi, ResourceApi, TestApi, TopicApi};
use crate::auth::{self, FileTokenStore, Route, TokenStore};
use crate::config::{Config, DetailVariant};
use crate::error::{AppResult, AuthError};
use crate::infrastructure::HttpClient;
use crate::models::{RecordId, Test, Topic};
use crate::services::{MutationRunner, Notifier, QueryCache, TracingNotifier};
use crate::utils::logging::log_startup;
use crate::workflow::{LoginFlow, TestDetailFlow, TestsFlow, TopicsFlow};
use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

/// 路径解析后要展示的内容
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login,
    Topics(Vec<Topic>),
    Tests(Vec<Test>),
    TopicDetail(Option<Topic>),
    TestDetail(Option<Test>),
}

/// 应用主结构
pub struct App {
    config: Config,
    http: Arc<HttpClient>,
    store: Arc<dyn TokenStore>,
    runner: MutationRunner,
}

impl App {
    /// 使用文件会话存储和日志通知初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.session_file));
        let app = Self::with_parts(config, store, Arc::new(TracingNotifier))?;
        log_startup(app.http.base_url(), app.is_authenticated());
        Ok(app)
    }

    /// 指定会话存储和通知出口
    pub fn with_parts(
        config: Config,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> AppResult<Self> {
        let http = Arc::new(HttpClient::new(&config, Arc::clone(&store))?);
        let runner = MutationRunner::new(Arc::new(QueryCache::new()), notifier);
        Ok(Self {
            config,
            http,
            store,
            runner,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// 当前会话的 chat_id
    pub fn current_chat_id(&self) -> AppResult<Option<String>> {
        Ok(self.store.get_token()?.map(|s| s.token().to_string()))
    }

    /// 受保护操作前的检查
    pub fn require_session(&self) -> AppResult<()> {
        match auth::follow(auth::guard::HOME_PATH, self.is_authenticated()) {
            Route::Login => Err(AuthError::NotAuthenticated.into()),
            _ => Ok(()),
        }
    }

    /// 按路由守卫解析路径
    pub fn navigate(&self, path: &str) -> Route {
        let route = auth::follow(path, self.is_authenticated());
        debug!("导航 {} -> {:?}", path, route);
        route
    }

    /// 打开路径并读取对应数据
    ///
    /// `/` 和 `/:id` 按部署方式解析成主题或测试。
    pub async fn open(&self, path: &str) -> AppResult<Screen> {
        let screen = match (self.navigate(path), self.config.detail_variant) {
            (Route::Login, _) => Screen::Login,
            (Route::Home, DetailVariant::Topic) => {
                let mut flow = self.topics_flow();
                flow.load_first_page().await?;
                Screen::Topics(flow.items().cloned().collect())
            }
            (Route::Home, DetailVariant::Test) => {
                let mut flow = self.tests_flow(None);
                flow.list_flow().load_first_page().await?;
                Screen::Tests(flow.items().cloned().collect())
            }
            (Route::Detail(id), DetailVariant::Topic) => {
                Screen::TopicDetail(self.topics_flow().detail(id).await?)
            }
            (Route::Detail(id), DetailVariant::Test) => {
                let mut flow = self.test_detail_flow(id);
                Screen::TestDetail(flow.load().await?.cloned())
            }
        };
        Ok(screen)
    }

    pub fn login_flow(&self) -> LoginFlow {
        LoginFlow::new(
            AuthApi::new(Arc::clone(&self.http)),
            Arc::clone(&self.store),
            Arc::clone(self.runner.notifier()),
        )
        .with_session_ttl(self.config.session_ttl_hours.map(Duration::hours))
    }

    /// 退出登录并丢弃上一个会话读到的缓存
    pub fn logout(&self) -> AppResult<()> {
        self.login_flow().logout()?;
        self.runner.cache().clear();
        Ok(())
    }

    pub fn topics_flow(&self) -> TopicsFlow {
        TopicsFlow::new(self.topic_api(), self.runner.clone(), self.config.page_limit)
    }

    pub fn tests_flow(&self, topic_id: Option<RecordId>) -> TestsFlow {
        let flow = TestsFlow::new(
            self.test_api(),
            self.topic_api(),
            self.runner.clone(),
            self.config.page_limit,
        );
        match topic_id {
            Some(topic_id) => flow.scoped_to(topic_id),
            None => flow,
        }
    }

    pub fn test_detail_flow(&self, test_id: RecordId) -> TestDetailFlow {
        TestDetailFlow::new(
            test_id,
            self.test_api(),
            QuestionApi::new(Arc::clone(&self.http)),
            OptionApi::new(Arc::clone(&self.http)),
            self.runner.clone(),
        )
    }

    fn topic_api(&self) -> TopicApi {
        ResourceApi::new(Arc::clone(&self.http))
    }

    fn test_api(&self) -> TestApi {
        ResourceApi::new(Arc::clone(&self.http))
    }
}
