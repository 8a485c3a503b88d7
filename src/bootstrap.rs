use bytesize::ByteSize;
use chrono::{DateTime, Local};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::config::{Config, Connection};
use crate::device::Device;
use crate::error::{Result, SyncError};
use crate::logger::MULTI_PROGRESS;
use crate::reconcile::{select_for_upload, Conflict};
use crate::scanner::{modified_seconds, scan};
use crate::types::SyncOutcome;

/// 一次完整的同步：识别设备、检查密码、比对两边文件、逐个上传
pub async fn bootstrap<D: Device + ?Sized>(config: &mut Config, device: &D, dir: &Path) -> Result<SyncOutcome> {
    let identity = device.fetch_identity(&config.connection).await?;
    info!(
        "{}",
        format!(
            "已连接 {} ({} - {}) 地址 {}",
            identity.hostname, identity.board_id, identity.mcu_name, identity.ip
        )
        .green()
    );
    if let Some(version) = &identity.version {
        info!("固件版本: {}", version);
    }

    // 锁定设备自报的主机名
    config.lock_hostname(&identity.hostname);

    let status = device.check_access(&config.connection).await?;
    if status == 401 {
        return Err(SyncError::Authentication {
            hostname: config.connection.hostname.clone(),
        });
    }

    let remote = device.list_files(&config.connection).await?;
    let local = scan(dir, &config.self_name, config.timestamp_policy).await?;

    let plan = select_for_upload(&local, &remote);
    for conflict in &plan.conflicts {
        report_conflict(conflict);
    }

    if plan.uploads.is_empty() {
        info!("所有文件都是最新的，无需上传");
        return Ok(SyncOutcome::UpToDate);
    }

    let total_size: u64 = plan.uploads.iter().map(|f| f.size).sum();
    info!("准备上传 {} 个文件，共 {}", plan.uploads.len(), ByteSize(total_size));

    let progress = MULTI_PROGRESS.add(ProgressBar::new(plan.uploads.len() as u64));
    if let Ok(style) = ProgressStyle::with_template("[{bar:30.green}] {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    let mut uploaded = 0;
    let mut failed = 0;
    for file in &plan.uploads {
        info!(" * 上传 {}", file.name);
        progress.set_message(file.name.clone());

        match upload_file(device, &config.connection, dir, &file.name).await {
            Ok(()) => uploaded += 1,
            Err(e) => {
                // 单个文件失败不影响其余文件
                error!("{}", e);
                failed += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if failed > 0 {
        warn!("上传完成: 成功 {} 个，失败 {} 个", uploaded, failed);
    } else {
        info!("{}", format!("上传完成: {} 个文件", uploaded).green());
    }

    Ok(SyncOutcome::Completed { uploaded, failed })
}

/// 读取文件内容并上传，时间戳使用此刻文件的实际修改时间(秒)
pub async fn upload_file<D: Device + ?Sized>(device: &D, conn: &Connection, dir: &Path, name: &str) -> Result<()> {
    let path = dir.join(name);
    let missing = |e: std::io::Error| {
        if e.kind() == ErrorKind::NotFound {
            SyncError::LocalFileMissing(name.to_string())
        } else {
            SyncError::Io(e)
        }
    };

    let content = fs::read(&path).await.map_err(missing)?;
    let metadata = fs::metadata(&path).await.map_err(missing)?;
    let modified_secs = modified_seconds(&metadata)?;

    device.upload(conn, name, content, modified_secs).await
}

fn report_conflict(conflict: &Conflict) {
    warn!(" ! {} 在设备上更新，不覆盖", conflict.name);
    warn!(
        "{} - 本地: {} 早于设备: {}",
        conflict.name,
        format_secs(conflict.local_secs),
        format_secs(conflict.remote_secs)
    );
}

fn format_secs(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(time) => time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => secs.to_string(),
    }
}
