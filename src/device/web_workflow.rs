use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Connection;
use crate::constants::{
    DEVICES_ENDPOINT, FS_PREFIX, JSON_CONTENT_TYPE, MILLIS_PER_SECOND, NANOS_PER_SECOND, ROOT_LISTING_ENDPOINT,
    TIMESTAMP_HEADER, VERSION_ENDPOINT,
};
use crate::device::base::Device;
use crate::error::{Result, SyncError};
use crate::types::{DeviceIdentity, FileRecord, PeerDevice};

/// `/fs/` 列表中的一项
/// ```json
/// {"name": "code.py", "directory": false, "modified_ns": 946684800000000000, "file_size": 22}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub directory: bool,
    pub modified_ns: i64,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl RemoteEntry {
    // 目录返回None
    fn into_record(self) -> Result<Option<FileRecord>> {
        if self.directory {
            return Ok(None);
        }
        let size = self
            .file_size
            .ok_or_else(|| SyncError::Protocol(format!("文件 {} 缺少file_size字段", self.name)))?;
        Ok(Some(FileRecord::new(self.name, size, self.modified_ns / NANOS_PER_SECOND)))
    }
}

// 设备列表有两种格式：直接的数组，或者 {"total": n, "devices": [...]}
#[derive(Deserialize)]
#[serde(untagged)]
enum DeviceList {
    Wrapped { devices: Vec<PeerDevice> },
    Bare(Vec<PeerDevice>),
}

pub fn parse_listing(body: &[u8]) -> Result<Vec<FileRecord>> {
    let entries: Vec<RemoteEntry> = decode(body, "文件列表")?;
    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(record) = entry.into_record()? {
            files.push(record);
        }
    }
    Ok(files)
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| SyncError::Protocol(format!("{}: {}", what, e)))
}

/// CircuitPython Web Workflow 的文件接口
#[derive(Clone)]
pub struct WebWorkflowDevice {
    client: Client,
}

impl WebWorkflowDevice {
    pub fn new() -> Result<Self> {
        // 不设置超时，单次请求挂起时整个流程一起等待
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    fn endpoint(conn: &Connection, path: &str) -> Result<Url> {
        let base = Url::parse(&format!("http://{}/", conn.hostname))?;
        Ok(base.join(path)?)
    }

    /// 文件名作为 `/fs/` 下的单个路径段，特殊字符会被转义
    pub fn file_url(conn: &Connection, name: &str) -> Result<Url> {
        let mut url = Self::endpoint(conn, FS_PREFIX)?;
        url.path_segments_mut()
            .map_err(|_| SyncError::Configuration(format!("无效的主机名: {}", conn.hostname)))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    fn authed(&self, builder: RequestBuilder, conn: &Connection) -> RequestBuilder {
        builder.basic_auth("", Some(&conn.password))
    }

    async fn get_json(&self, conn: &Connection, path: &str) -> Result<Response> {
        let url = Self::endpoint(conn, path)?;
        debug!("GET {}", url);
        let response = self
            .authed(self.client.get(url), conn)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .send()
            .await?;
        Ok(response)
    }

    async fn expect_success(response: Response, what: &str) -> Result<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Protocol(format!("{}请求失败: HTTP {}", what, status.as_u16())));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Device for WebWorkflowDevice {
    async fn fetch_identity(&self, conn: &Connection) -> Result<DeviceIdentity> {
        let response = self.get_json(conn, VERSION_ENDPOINT).await?;
        let body = Self::expect_success(response, "设备信息").await?;
        decode(&body, "设备信息")
    }

    async fn list_devices(&self, conn: &Connection) -> Result<Vec<PeerDevice>> {
        let response = self.get_json(conn, DEVICES_ENDPOINT).await?;
        let body = Self::expect_success(response, "设备列表").await?;
        Ok(match decode::<DeviceList>(&body, "设备列表")? {
            DeviceList::Wrapped { devices } => devices,
            DeviceList::Bare(devices) => devices,
        })
    }

    async fn check_access(&self, conn: &Connection) -> Result<u16> {
        let response = self.get_json(conn, ROOT_LISTING_ENDPOINT).await?;
        Ok(response.status().as_u16())
    }

    async fn list_files(&self, conn: &Connection) -> Result<Vec<FileRecord>> {
        let response = self.get_json(conn, ROOT_LISTING_ENDPOINT).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(SyncError::Authentication {
                hostname: conn.hostname.clone(),
            });
        }
        let body = Self::expect_success(response, "文件列表").await?;
        let files = parse_listing(&body)?;
        info!("设备上共 {} 个文件", files.len());
        Ok(files)
    }

    async fn upload(&self, conn: &Connection, name: &str, content: Vec<u8>, modified_secs: i64) -> Result<()> {
        let url = Self::file_url(conn, name)?;
        debug!("PUT {} ({} 字节)", url, content.len());
        let response = self
            .authed(self.client.put(url), conn)
            .header(TIMESTAMP_HEADER, (modified_secs * MILLIS_PER_SECOND).to_string())
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Upload {
                name: name.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(hostname: &str) -> Connection {
        Connection {
            hostname: hostname.to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn listing_drops_directories_and_truncates_nanoseconds() {
        let body = br#"[
            {"name": "lib", "directory": true, "modified_ns": 1000000000000, "file_size": 0},
            {"name": "code.py", "directory": false, "modified_ns": 1700000101999999999, "file_size": 22}
        ]"#;
        let files = parse_listing(body).unwrap();
        assert_eq!(files, vec![FileRecord::new("code.py", 22, 1_700_000_101)]);
    }

    #[test]
    fn listing_directory_without_size_is_accepted() {
        let body = br#"[{"name": "lib", "directory": true, "modified_ns": 0}]"#;
        assert!(parse_listing(body).unwrap().is_empty());
    }

    #[test]
    fn listing_file_without_size_is_protocol_error() {
        let body = br#"[{"name": "code.py", "directory": false, "modified_ns": 0}]"#;
        assert!(matches!(parse_listing(body), Err(SyncError::Protocol(_))));
    }

    #[test]
    fn listing_with_wrong_types_is_protocol_error() {
        assert!(matches!(parse_listing(b"not json"), Err(SyncError::Protocol(_))));
        let body = br#"[{"name": "code.py", "directory": "no", "modified_ns": 0, "file_size": 1}]"#;
        assert!(matches!(parse_listing(body), Err(SyncError::Protocol(_))));
    }

    #[test]
    fn file_url_escapes_name() {
        let url = WebWorkflowDevice::file_url(&conn("cpy.local"), "my file#1.py").unwrap();
        assert_eq!(url.as_str(), "http://cpy.local/fs/my%20file%231.py");
    }

    #[test]
    fn endpoint_keeps_port() {
        let url = WebWorkflowDevice::endpoint(&conn("127.0.0.1:8080"), ROOT_LISTING_ENDPOINT).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/fs/");
    }
}
