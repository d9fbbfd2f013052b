//! 命令行入口
//!
//! 每个子命令对应原来页面上的一个操作。除 `login` 外，所有命令都要先通过
//! 路由守卫：没有会话时直接提示登录。

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use quiz_admin::models::{
    DifficultyLevel, QuestionPatch, RecordId, TestDraft, TestPatch, TopicDraft, TopicPatch,
};
use quiz_admin::{App, MutationOutcome, Screen};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(name = "quiz-admin", version, about = "题库管理控制台")]
pub struct Cli {
    /// TOML 配置文件
    #[clap(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// 用 Telegram chat_id 登录
    Login { chat_id: String },
    /// 退出登录
    Logout,
    /// 显示当前登录的 chat_id
    Whoami,
    /// 按路由打开页面，例如 `/` 或 `/12`
    Open { path: String },
    /// 主题
    #[clap(subcommand)]
    Topics(TopicCommand),
    /// 测试
    #[clap(subcommand)]
    Tests(TestCommand),
    /// 题目
    #[clap(subcommand)]
    Questions(QuestionCommand),
    /// 选项
    #[clap(subcommand)]
    Options(OptionCommand),
}

#[derive(Subcommand)]
pub enum TopicCommand {
    List {
        /// 加载全部页
        #[clap(long)]
        all: bool,
    },
    Show { id: RecordId },
    Create {
        #[clap(long)]
        name: String,
        #[clap(long, default_value = "")]
        description: String,
        #[clap(long)]
        inactive: bool,
    },
    Update {
        id: RecordId,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        active: Option<bool>,
    },
    Delete { id: RecordId },
}

#[derive(Subcommand)]
pub enum TestCommand {
    List {
        #[clap(long)]
        all: bool,
        /// 只看某个主题下的测试
        #[clap(long)]
        topic: Option<RecordId>,
    },
    Show { id: RecordId },
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        difficulty: Option<DifficultyLevel>,
        #[clap(long)]
        inactive: bool,
        #[clap(long)]
        topic: Option<RecordId>,
    },
    Update {
        id: RecordId,
        #[clap(long)]
        name: Option<String>,
        /// EASY / MEDIUM / HARD / EXPERT，`none` 表示清空
        #[clap(long)]
        difficulty: Option<String>,
        #[clap(long)]
        active: Option<bool>,
    },
    Delete { id: RecordId },
}

#[derive(Subcommand)]
pub enum QuestionCommand {
    Add {
        #[clap(long)]
        test: RecordId,
        #[clap(long)]
        text: String,
        #[clap(long)]
        score: Option<f64>,
    },
    Update {
        #[clap(long)]
        test: RecordId,
        id: RecordId,
        #[clap(long)]
        text: Option<String>,
        #[clap(long)]
        score: Option<f64>,
    },
    Delete {
        #[clap(long)]
        test: RecordId,
        id: RecordId,
    },
}

#[derive(Subcommand)]
pub enum OptionCommand {
    /// 给题目新增一个空白选项
    Add {
        #[clap(long)]
        test: RecordId,
        #[clap(long)]
        question: RecordId,
    },
    Update {
        #[clap(long)]
        test: RecordId,
        id: RecordId,
        #[clap(long)]
        text: String,
    },
    Delete {
        #[clap(long)]
        test: RecordId,
        id: RecordId,
    },
    /// 把选项设为该题唯一的正确答案
    MarkCorrect {
        #[clap(long)]
        test: RecordId,
        #[clap(long)]
        question: RecordId,
        #[clap(long)]
        option: RecordId,
    },
}

/// 执行命令
pub async fn dispatch(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { chat_id } => {
            let session = finish(app.login_flow().login(&chat_id).await)?;
            println!("已登录: {}", session.token());
            Ok(())
        }
        Command::Logout => {
            app.logout()?;
            Ok(())
        }
        Command::Whoami => {
            match app.current_chat_id()? {
                Some(chat_id) => println!("{}", chat_id),
                None => println!("未登录"),
            }
            Ok(())
        }
        Command::Open { path } => {
            let screen = app.open(&path).await?;
            print_screen(&screen)
        }
        Command::Topics(command) => {
            app.require_session()?;
            topics(app, command).await
        }
        Command::Tests(command) => {
            app.require_session()?;
            tests(app, command).await
        }
        Command::Questions(command) => {
            app.require_session()?;
            questions(app, command).await
        }
        Command::Options(command) => {
            app.require_session()?;
            options(app, command).await
        }
    }
}

async fn topics(app: &App, command: TopicCommand) -> Result<()> {
    let mut flow = app.topics_flow();
    match command {
        TopicCommand::List { all } => {
            if all {
                flow.load_all().await?;
            } else {
                flow.load_first_page().await?;
            }
            let items: Vec<_> = flow.items().collect();
            print_json(&items)?;
            println!(
                "共 {} 条，已加载 {} 页{}",
                flow.list().total_count(),
                flow.list().loaded_pages(),
                if flow.list().has_next_page() { "，还有更多" } else { "" }
            );
            Ok(())
        }
        TopicCommand::Show { id } => {
            let topic = flow.detail(id).await?.ok_or_else(|| anyhow!("主题 #{} 不存在", id))?;
            print_json(&topic)
        }
        TopicCommand::Create {
            name,
            description,
            inactive,
        } => {
            let draft = TopicDraft {
                name,
                description,
                active: !inactive,
            };
            let created = finish(flow.create(&draft).await)?;
            print_json(&created)
        }
        TopicCommand::Update {
            id,
            name,
            description,
            active,
        } => {
            let patch = TopicPatch {
                name,
                description,
                active,
            };
            if patch.is_empty() {
                bail!("没有需要更新的字段");
            }
            finish(flow.update(id, &patch).await)
        }
        TopicCommand::Delete { id } => finish(flow.delete(id).await),
    }
}

async fn tests(app: &App, command: TestCommand) -> Result<()> {
    match command {
        TestCommand::List { all, topic } => {
            let mut flow = app.tests_flow(topic);
            if topic.is_some() {
                let tests = flow
                    .topic_tests()
                    .await?
                    .ok_or_else(|| anyhow!("主题不存在"))?;
                return print_json(&tests);
            }
            if all {
                flow.list_flow().load_all().await?;
            } else {
                flow.list_flow().load_first_page().await?;
            }
            let items: Vec<_> = flow.items().collect();
            print_json(&items)
        }
        TestCommand::Show { id } => {
            let mut flow = app.test_detail_flow(id);
            let test = flow.load().await?.ok_or_else(|| anyhow!("测试 #{} 不存在", id))?;
            print_json(test)
        }
        TestCommand::Create {
            name,
            difficulty,
            inactive,
            topic,
        } => {
            let mut flow = app.tests_flow(topic);
            let draft = TestDraft {
                name,
                difficulty_level: difficulty,
                active: !inactive,
                topic_id: None,
            };
            let created = finish(flow.create(draft).await)?;
            print_json(&created)
        }
        TestCommand::Update {
            id,
            name,
            difficulty,
            active,
        } => {
            let difficulty_level = difficulty.map(|d| parse_difficulty(&d)).transpose()?;
            let patch = TestPatch {
                name,
                difficulty_level,
                active,
                topic_id: None,
            };
            let mut flow = app.tests_flow(None);
            finish(flow.list_flow().update(id, &patch).await)
        }
        TestCommand::Delete { id } => {
            let mut flow = app.tests_flow(None);
            finish(flow.list_flow().delete(id).await)
        }
    }
}

async fn questions(app: &App, command: QuestionCommand) -> Result<()> {
    match command {
        QuestionCommand::Add { test, text, score } => {
            let mut flow = app.test_detail_flow(test);
            let created = finish(flow.add_question(&text, score).await)?;
            print_json(&created)
        }
        QuestionCommand::Update {
            test,
            id,
            text,
            score,
        } => {
            let mut flow = app.test_detail_flow(test);
            let patch = QuestionPatch {
                question: text,
                question_score: score,
            };
            finish(flow.update_question(id, patch).await)
        }
        QuestionCommand::Delete { test, id } => {
            let mut flow = app.test_detail_flow(test);
            finish(flow.delete_question(id).await)
        }
    }
}

async fn options(app: &App, command: OptionCommand) -> Result<()> {
    match command {
        OptionCommand::Add { test, question } => {
            let mut flow = app.test_detail_flow(test);
            let created = finish(flow.add_option(question).await)?;
            print_json(&created)
        }
        OptionCommand::Update { test, id, text } => {
            let mut flow = app.test_detail_flow(test);
            finish(flow.edit_option_text(id, &text).await)
        }
        OptionCommand::Delete { test, id } => {
            let mut flow = app.test_detail_flow(test);
            finish(flow.delete_option(id).await)
        }
        OptionCommand::MarkCorrect {
            test,
            question,
            option,
        } => {
            let mut flow = app.test_detail_flow(test);
            flow.load().await?;
            let report = finish(flow.mark_correct(question, option).await)?;
            println!(
                "已更新 {} 个选项，失败 {} 个，当前正确选项数: {}",
                report.applied.len(),
                report.failed.len(),
                report
                    .correct_after
                    .map_or_else(|| "未知".to_string(), |c| c.to_string())
            );
            Ok(())
        }
    }
}

fn parse_difficulty(raw: &str) -> Result<Option<DifficultyLevel>> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    DifficultyLevel::from_code(raw)
        .map(Some)
        .with_context(|| format!("未知难度: {}", raw))
}

/// 写操作被拒绝时以错误退出（提示已经通过通知输出）
fn finish<T>(outcome: MutationOutcome<T>) -> Result<T> {
    match outcome {
        MutationOutcome::Applied(value) => Ok(value),
        MutationOutcome::Rejected { message } => Err(anyhow!(message)),
    }
}

fn print_screen(screen: &Screen) -> Result<()> {
    match screen {
        Screen::Login => {
            println!("未登录，请先执行: quiz-admin login <chat_id>");
            Ok(())
        }
        Screen::Topics(topics) => print_json(topics),
        Screen::Tests(tests) => print_json(tests),
        Screen::TopicDetail(topic) => print_json(topic),
        Screen::TestDetail(test) => print_json(test),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
