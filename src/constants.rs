// 设备端Web Workflow接口
pub const VERSION_ENDPOINT: &str = "cp/version.json";
pub const DEVICES_ENDPOINT: &str = "cp/devices.json";
// 根目录列表，结尾的斜杠不能省略
pub const ROOT_LISTING_ENDPOINT: &str = "fs/";
pub const FS_PREFIX: &str = "fs/";

pub const TIMESTAMP_HEADER: &str = "X-Timestamp";
pub const JSON_CONTENT_TYPE: &str = "application/json";

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const MILLIS_PER_SECOND: i64 = 1_000;

// 进程退出码
pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_NOTHING_TO_DO: i32 = 2;
