use crate::domain::port::{LogLevel, Logger};
use std::collections::HashMap;
use uuid::Uuid;

/// tracing のイベントとしてログを出力するロガー
/// 出力先と書式は main で設定する subscriber が決める
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

/// コンテキストをキー順に "k=v, k=v" 形式へ整形する
fn format_context(context: Option<HashMap<String, String>>) -> String {
    let mut pairs: Vec<(String, String)> = context.unwrap_or_default().into_iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Logger for TracingLogger {
    fn log(
        &self,
        level: LogLevel,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        let correlation_id = correlation_id.map(|id| id.to_string()).unwrap_or_default();
        let context = format_context(context);

        match level {
            LogLevel::Debug => {
                tracing::debug!(component, correlation_id, context, "{}", message)
            }
            LogLevel::Info => {
                tracing::info!(component, correlation_id, context, "{}", message)
            }
            LogLevel::Warning => {
                tracing::warn!(component, correlation_id, context, "{}", message)
            }
            LogLevel::Error => {
                tracing::error!(component, correlation_id, context, "{}", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_sorted_by_key() {
        let mut context = HashMap::new();
        context.insert("item_id".to_string(), "10".to_string());
        context.insert("booking_id".to_string(), "7".to_string());

        assert_eq!(format_context(Some(context)), "booking_id=7, item_id=10");
        assert_eq!(format_context(None), "");
    }

    #[test]
    fn test_logging_without_subscriber_does_not_panic() {
        let logger = TracingLogger::new();
        logger.info("TestComponent", "Test message", Some(Uuid::new_v4()), None);
        logger.warn("TestComponent", "Rejected", None, Some(HashMap::new()));
    }
}
