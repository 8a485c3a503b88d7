use log::{info, warn};
use std::env;
use std::path::Path;

use crate::error::{Result, SyncError};

/// 本地修改时间的取整方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// 向下取整到秒
    Exact,
    /// 取整到秒后再向下取整到偶数秒，设备端文件系统只有2秒精度
    #[default]
    EvenSecond,
}

impl TimestampPolicy {
    // 读取EVEN_TIMESTAMPS环境变量，未设置时使用偶数秒
    fn from_env() -> Self {
        match env::var("EVEN_TIMESTAMPS") {
            Ok(v) if v == "false" || v == "0" => TimestampPolicy::Exact,
            _ => TimestampPolicy::EvenSecond,
        }
    }
}

/// 访问设备所需的连接信息
#[derive(Debug, Clone)]
pub struct Connection {
    pub hostname: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub connection: Connection,
    // 扫描时需要跳过的自身文件名
    pub self_name: String,
    pub timestamp_policy: TimestampPolicy,
}

impl Config {
    pub fn new(hostname: String, password: String, self_name: String, exact_mtime: bool) -> Result<Self> {
        if hostname.trim().is_empty() {
            return Err(SyncError::Configuration("主机名不能为空".to_string()));
        }

        let timestamp_policy = if exact_mtime {
            TimestampPolicy::Exact
        } else {
            TimestampPolicy::from_env()
        };

        Ok(Config {
            connection: Connection {
                hostname: hostname.trim().to_string(),
                password,
            },
            self_name,
            timestamp_policy,
        })
    }

    /// 锁定设备自报的主机名，之后的请求都发往这个地址
    pub fn lock_hostname(&mut self, canonical: &str) {
        let canonical = canonical.trim();
        if canonical.is_empty() {
            warn!("设备未返回主机名，继续使用 {}", self.connection.hostname);
            return;
        }
        if canonical != self.connection.hostname {
            info!("主机名由 {} 切换为 {}", self.connection.hostname, canonical);
        }
        self.connection.hostname = canonical.to_string();
    }
}

/// 当前程序的文件名(argv[0]的最后一段)
pub fn program_name(argv0: Option<&str>) -> String {
    argv0
        .and_then(|arg| Path::new(arg).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or(env!("CARGO_PKG_NAME"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hostname: &str) -> Config {
        Config::new(hostname.to_string(), "secret".to_string(), "board-sync".to_string(), true).unwrap()
    }

    #[test]
    fn rejects_blank_hostname() {
        let err = Config::new("  ".to_string(), "pw".to_string(), "x".to_string(), false).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }

    #[test]
    fn exact_flag_selects_exact_policy() {
        assert_eq!(config("cpy.local").timestamp_policy, TimestampPolicy::Exact);
    }

    #[test]
    fn lock_hostname_replaces_typed_name() {
        let mut config = config("192.168.1.20");
        config.lock_hostname("cpy-a1b2c3.local");
        assert_eq!(config.connection.hostname, "cpy-a1b2c3.local");
    }

    #[test]
    fn lock_hostname_ignores_blank_name() {
        let mut config = config("192.168.1.20");
        config.lock_hostname(" ");
        assert_eq!(config.connection.hostname, "192.168.1.20");
    }

    #[test]
    fn program_name_takes_last_component() {
        assert_eq!(program_name(Some("/usr/local/bin/board-sync")), "board-sync");
        assert_eq!(program_name(Some("upload")), "upload");
        assert_eq!(program_name(None), "board-sync");
    }
}
