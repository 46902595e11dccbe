//! 경고 판정 및 발송.
//!
//! [`AlertEngine`]은 실패 엔트리마다 윈도우 상태와 억제 집합을 평가하는
//! 동기 판정부입니다. 발송 자체(enrichment 수집 + 알림 전송)는 제한된
//! 크기의 채널 뒤에 있는 [`AlertDispatcher`] 워커가 담당하므로, 외부
//! 서비스가 느려도 로그 수집이 막히지 않습니다.
//!
//! at-most-once 보장: 억제 집합은 엔진(단일 소유자)이 enqueue 전에
//! 갱신하므로, 같은 ID에 대해 경고가 두 번 발송될 수 없습니다.

use crate::config::SuppressionPolicy;
use crate::tracker::FailureWindowTracker;
use authwatch_core::LogEntry;
use authwatch_notification::{
    EnrichmentProvider, Notification, NotificationEvent, NotificationPriority, NotificationSender,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// 발송 워커로 전달되는 경고 작업.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertJob {
    /// 경고 대상 Unique ID
    pub identity: String,
    /// 윈도우를 채운 세 번째(가장 최근) 실패의 타임스탬프
    pub timestamp: String,
}

/// 엔트리 하나를 관찰한 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveOutcome {
    /// 실패가 아닌 엔트리 - 추적기에 전달되지 않음
    Ignored,
    /// 실패 기록됨, 임계값 미도달
    Recorded,
    /// 임계값 도달, 경고가 발송 대기열에 등록됨
    AlertEnqueued,
    /// 임계값 도달했지만 이미 경고된 ID - 억제됨
    Suppressed,
    /// 대기열 포화로 경고 유실 (억제 상태는 유지됨)
    AlertDropped,
}

/// 실패 윈도우 평가와 경고 발송 결정을 담당하는 엔진.
pub struct AlertEngine {
    tracker: FailureWindowTracker,
    suppressed: HashSet<String>,
    policy: SuppressionPolicy,
    alert_tx: mpsc::Sender<AlertJob>,
}

impl AlertEngine {
    /// 새 판정 엔진을 생성합니다.
    pub fn new(
        threshold: usize,
        policy: SuppressionPolicy,
        alert_tx: mpsc::Sender<AlertJob>,
    ) -> Self {
        Self {
            tracker: FailureWindowTracker::new(threshold),
            suppressed: HashSet::new(),
            policy,
            alert_tx,
        }
    }

    /// 파싱된 엔트리 하나를 처리합니다.
    ///
    /// 실패 엔트리만 윈도우에 기록합니다. 윈도우가 임계값에 도달하고
    /// 해당 ID가 억제 집합에 없으면 경고를 대기열에 등록한 뒤 윈도우를
    /// 초기화합니다. 경고에 실리는 타임스탬프는 윈도우를 완성한 가장
    /// 최근 엔트리의 것입니다.
    pub fn observe(&mut self, entry: LogEntry) -> ObserveOutcome {
        if !entry.is_failure() {
            return ObserveOutcome::Ignored;
        }

        let identity = entry.identity.clone();
        let timestamp = entry.timestamp.clone();
        self.tracker.record_failure(entry);

        if !self.tracker.is_tripped(&identity) {
            return ObserveOutcome::Recorded;
        }

        if self.suppressed.contains(&identity) {
            debug!(identity = %identity, "임계값 도달했으나 이미 경고된 ID, 억제");
            return ObserveOutcome::Suppressed;
        }

        // 억제 표시는 enqueue보다 먼저 - 같은 ID의 중복 발송 차단
        if self.policy == SuppressionPolicy::OncePerRun {
            self.suppressed.insert(identity.clone());
        }
        self.tracker.reset(&identity);

        let job = AlertJob {
            identity: identity.clone(),
            timestamp,
        };
        match self.alert_tx.try_send(job) {
            Ok(()) => {
                info!(identity = %identity, "연속 실패 임계값 도달, 경고 발송 대기열 등록");
                ObserveOutcome::AlertEnqueued
            }
            Err(e) => {
                error!(identity = %identity, error = %e, "경고 대기열 포화, 경고 유실");
                ObserveOutcome::AlertDropped
            }
        }
    }

    /// 해당 ID가 억제 중인지 확인합니다.
    pub fn is_suppressed(&self, identity: &str) -> bool {
        self.suppressed.contains(identity)
    }

    /// 추적기 참조 (테스트 및 상태 조회용).
    pub fn tracker(&self) -> &FailureWindowTracker {
        &self.tracker
    }
}

/// 대기열에서 경고 작업을 꺼내 enrichment 수집 후 알림을 전송하는 워커.
///
/// 전송 실패는 기록만 하고 재시도하지 않습니다. 채널이 닫히면
/// (엔진이 drop되면) 남은 작업을 모두 처리한 뒤 종료합니다.
pub struct AlertDispatcher {
    alert_rx: mpsc::Receiver<AlertJob>,
    enrichment: Arc<dyn EnrichmentProvider>,
    notifier: Arc<dyn NotificationSender>,
}

impl AlertDispatcher {
    /// 새 발송 워커를 생성합니다.
    pub fn new(
        alert_rx: mpsc::Receiver<AlertJob>,
        enrichment: Arc<dyn EnrichmentProvider>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            alert_rx,
            enrichment,
            notifier,
        }
    }

    /// 채널이 닫힐 때까지 경고 작업을 처리합니다.
    ///
    /// 전송된 알림 수를 반환합니다.
    pub async fn run(mut self) -> usize {
        let mut dispatched = 0;

        while let Some(job) = self.alert_rx.recv().await {
            let context = self.enrichment.collect().await;

            let notification = Notification::new(NotificationEvent::FailedLoginBurst {
                identity: job.identity.clone(),
                timestamp: job.timestamp.clone(),
            })
            .with_priority(NotificationPriority::Critical)
            .with_context(context);

            match self.notifier.send(&notification).await {
                Ok(()) => {
                    dispatched += 1;
                    info!(
                        identity = %job.identity,
                        sender = self.notifier.name(),
                        "경고 알림 전송 완료"
                    );
                }
                Err(e) => {
                    // 재시도/큐잉 없음 - 이 경고는 유실 처리
                    warn!(
                        identity = %job.identity,
                        sender = self.notifier.name(),
                        error = %e,
                        "경고 알림 전송 실패, 해당 경고 유실"
                    );
                }
            }
        }

        debug!(dispatched, "경고 발송 워커 종료");
        dispatched
    }
}
