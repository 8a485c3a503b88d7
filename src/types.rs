use serde::Deserialize;

/// 参与比对的单个文件元数据，名称在同一份列表内唯一
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub size: u64,
    pub modified_secs: i64,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, size: u64, modified_secs: i64) -> Self {
        FileRecord {
            name: name.into(),
            size,
            modified_secs,
        }
    }
}

/// `/cp/version.json` 返回的设备信息
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceIdentity {
    pub hostname: String,
    pub board_id: String,
    pub mcu_name: String,
    pub ip: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build_date: Option<String>,
    #[serde(default)]
    pub web_api_version: Option<u32>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// `/cp/devices.json` 中的一台局域网设备
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PeerDevice {
    pub hostname: String,
    #[serde(default)]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    UpToDate,
    Completed { uploaded: usize, failed: usize },
}
