use crate::library::logger::interface::{join_namespace, LogLevel, Logger};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: chrono::FixedOffset,
}

impl LoggerConsole {
    pub fn new(timezone: chrono::FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
        }
    }
}

impl Logger for LoggerConsole {
    fn log(&self, level: LogLevel, message: &str) {
        let local_time = Utc::now().with_timezone(&self.timezone);
        let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
        let line = match &self.namespace {
            Some(namespace) => format!("[{}] {:<5} {}: {}", formatted, level, namespace, message),
            None => format!("[{}] {:<5} {}", formatted, level, message),
        };
        match level {
            LogLevel::Info => println!("{}", line),
            LogLevel::Warn | LogLevel::Error => eprintln!("{}", line),
        }
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole {
            namespace: Some(join_namespace(self.namespace.as_deref(), namespace)),
            timezone: self.timezone,
        })
    }
}
