use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::fs::Metadata;
use std::io::{self, ErrorKind};
use std::path::Path;
use tokio::fs;

use crate::config::TimestampPolicy;
use crate::error::{Result, SyncError};
use crate::types::FileRecord;

/// 修改时间向下取整到秒，早于1970年的时间同样向下取整
pub fn modified_seconds(metadata: &Metadata) -> Result<i64> {
    let modified: DateTime<Utc> = metadata.modified()?.into();
    Ok(modified.timestamp())
}

pub fn quantize(secs: i64, policy: TimestampPolicy) -> i64 {
    match policy {
        TimestampPolicy::Exact => secs,
        TimestampPolicy::EvenSecond => secs.div_euclid(2) * 2,
    }
}

// 扫描期间被删除的文件返回None
fn skip_vanished<T>(result: io::Result<T>, name: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("文件已被删除，跳过: {}", name);
            Ok(None)
        }
        Err(e) => Err(SyncError::Io(e)),
    }
}

/// 列出目录下的普通文件(不递归，不跟随符号链接)，跳过 `exclude_name`
pub async fn scan<P: AsRef<Path>>(dir: P, exclude_name: &str, policy: TimestampPolicy) -> Result<Vec<FileRecord>> {
    let mut records = Vec::new();
    let mut entries = fs::read_dir(dir.as_ref()).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!("跳过无法识别的文件名: {:?}", raw);
                continue;
            }
        };

        match skip_vanished(entry.file_type().await, &name)? {
            Some(file_type) if file_type.is_file() => {}
            _ => continue,
        }

        if name == exclude_name {
            debug!("跳过程序自身: {}", name);
            continue;
        }

        let Some(metadata) = skip_vanished(entry.metadata().await, &name)? else {
            continue;
        };
        let modified_secs = quantize(modified_seconds(&metadata)?, policy);
        records.push(FileRecord::new(name, metadata.len(), modified_secs));
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("本地共 {} 个文件", records.len());
    Ok(records)
}
