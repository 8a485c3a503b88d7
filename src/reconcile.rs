use std::collections::HashMap;

use crate::types::FileRecord;

/// 设备上的副本比本地新，不会被覆盖
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    pub local_secs: i64,
    pub remote_secs: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub uploads: Vec<FileRecord>,
    pub conflicts: Vec<Conflict>,
}

/// 选出需要上传的本地文件，保持本地列表的顺序
pub fn select_for_upload(local: &[FileRecord], remote: &[FileRecord]) -> Reconciliation {
    let remote_by_name: HashMap<&str, &FileRecord> = remote.iter().map(|r| (r.name.as_str(), r)).collect();
    let mut result = Reconciliation::default();

    for file in local {
        let Some(remote) = remote_by_name.get(file.name.as_str()) else {
            // 设备上没有这个文件
            result.uploads.push(file.clone());
            continue;
        };

        let mut update = false;
        if remote.modified_secs < file.modified_secs {
            update = true;
        }
        if remote.size != file.size {
            update = true;
        }
        // 设备上更新时一律不覆盖，即使大小不同
        // TODO: 本地时钟落后且内容已修改时会丢掉本地改动，确认是否改为上传或提示
        if remote.modified_secs > file.modified_secs {
            update = false;
            result.conflicts.push(Conflict {
                name: file.name.clone(),
                local_secs: file.modified_secs,
                remote_secs: remote.modified_secs,
            });
        }

        if update {
            result.uploads.push(file.clone());
        }
    }

    result
}
