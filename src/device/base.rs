use async_trait::async_trait;

use crate::config::Connection;
use crate::error::Result;
use crate::types::{DeviceIdentity, FileRecord, PeerDevice};

#[async_trait]
pub trait Device: Send + Sync {
    async fn fetch_identity(&self, conn: &Connection) -> Result<DeviceIdentity>;

    // 同一局域网内设备自己发现的其他设备，主流程不使用
    async fn list_devices(&self, conn: &Connection) -> Result<Vec<PeerDevice>>;

    /// 只返回根目录请求的状态码，不解析响应体，401表示密码错误
    async fn check_access(&self, conn: &Connection) -> Result<u16>;

    /// 根目录下的文件，目录已被过滤掉
    async fn list_files(&self, conn: &Connection) -> Result<Vec<FileRecord>>;

    async fn upload(&self, conn: &Connection, name: &str, content: Vec<u8>, modified_secs: i64) -> Result<()>;
}
