//! 바이트 오프셋 기반 증분 로그 파일 리더.
//!
//! 마지막으로 소비한 바이트 위치를 기억하고, 그 이후에 추가된 완결된
//! 라인만 반환합니다. 같은 바이트 범위를 두 번 전달하지 않으며,
//! 종결자(`\n`)가 아직 없는 꼬리 부분 라인은 다음 호출까지 소비하지
//! 않습니다.

use authwatch_core::MonitorResult;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tracing::{debug, warn};

/// 증분 로그 리더.
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
}

impl LogTailer {
    /// 로그 파일을 열어 tailer를 생성합니다.
    ///
    /// 파일을 열 수 없으면 (`NotFound`, `PermissionDenied` 등) 해당 I/O
    /// 에러를 그대로 반환합니다. 읽기는 파일 시작(오프셋 0)부터 시작합니다.
    pub async fn open(path: impl AsRef<Path>) -> MonitorResult<Self> {
        let path = path.as_ref().to_path_buf();
        File::open(&path).await?;

        Ok(Self { path, offset: 0 })
    }

    /// 현재 바이트 오프셋을 반환합니다. 단조 비감소가 보장됩니다
    /// (파일 절단/교체가 감지된 경우 제외).
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 마지막 호출 이후 추가된 완결된 라인을 순서대로 반환합니다.
    ///
    /// 새로운 내용이 없으면 빈 벡터를 반환합니다. 오프셋은 소비한
    /// 바이트 수만큼만 전진합니다.
    pub async fn read_new_lines(&mut self) -> MonitorResult<Vec<String>> {
        let mut file = File::open(&self.path).await?;
        let size = file.metadata().await?.len();

        if size < self.offset {
            warn!(
                path = %self.path.display(),
                previous_offset = self.offset,
                current_size = size,
                "로그 파일이 절단되거나 교체됨, 오프셋 초기화"
            );
            self.offset = 0;
        }

        if size == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset)).await?;
        let mut buffer = Vec::with_capacity((size - self.offset) as usize);
        file.take(size - self.offset)
            .read_to_end(&mut buffer)
            .await?;

        // 마지막 종결자까지만 소비, 미완결 꼬리 라인은 남겨둠
        let consumable = match buffer.iter().rposition(|&b| b == b'\n') {
            Some(last_newline) => last_newline + 1,
            None => {
                debug!(
                    path = %self.path.display(),
                    pending_bytes = buffer.len(),
                    "완결된 라인 없음, 대기"
                );
                return Ok(Vec::new());
            }
        };

        self.offset += consumable as u64;

        let lines = buffer[..consumable]
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                String::from_utf8_lossy(line).into_owned()
            })
            .collect();

        Ok(lines)
    }
}
