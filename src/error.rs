use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("设备 {hostname} 拒绝访问，密码错误")]
    Authentication { hostname: String },
    #[error("设备返回的数据无法解析: {0}")]
    Protocol(String),
    #[error("上传文件失败: {name} - HTTP {status}")]
    Upload { name: String, status: u16 },
    #[error("本地文件已不存在: {0}")]
    LocalFileMissing(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
