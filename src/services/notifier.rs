//! 通知服务 - 业务能力层
//!
//! 只负责"把结果告诉用户"，不关心流程

use std::sync::Mutex;
use tracing::{error, info, warn};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// 一条临时通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// 通知出口
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 写入日志的通知
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!("✓ {}", notification.message),
            NotificationLevel::Warning => warn!("⚠️ {}", notification.message),
            NotificationLevel::Error => error!("❌ {}", notification.message),
        }
    }
}

/// 记录所有通知，便于检查
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出并清空已记录的通知
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// 最后一条通知
    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
