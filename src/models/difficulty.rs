use serde::{Deserialize, Serialize};

/// 测试难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DifficultyLevel {
    /// 简单
    Easy,
    /// 中等
    Medium,
    /// 困难
    Hard,
    /// 专家
    Expert,
}

impl DifficultyLevel {
    /// 全部难度，按由易到难排列
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
        DifficultyLevel::Expert,
    ];

    /// 线上传输使用的代码
    pub fn code(self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "EASY",
            DifficultyLevel::Medium => "MEDIUM",
            DifficultyLevel::Hard => "HARD",
            DifficultyLevel::Expert => "EXPERT",
        }
    }

    /// 从代码解析难度（忽略大小写）
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("未知难度: {}", s))
    }
}
