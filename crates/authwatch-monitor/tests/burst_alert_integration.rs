//! 연속 실패 burst 경고 통합 테스트.
//!
//! tailer → parser → 판정 엔진 → 발송 워커 전체 경로를 실제 로그 파일로
//! 검증합니다. 외부 서비스는 기록용 mock으로 대체합니다.

use async_trait::async_trait;
use authwatch_monitor::{AlertDispatcher, AlertEngine, LogTailer, Monitor, MonitorConfig, SuppressionPolicy};
use authwatch_notification::{
    EnrichmentProvider, Notification, NotificationEvent, NotificationResult, NotificationSender,
    SystemContext,
};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// 고정 컨텍스트를 반환하는 enrichment mock.
struct StaticEnrichment;

#[async_trait]
impl EnrichmentProvider for StaticEnrichment {
    async fn collect(&self) -> SystemContext {
        SystemContext {
            hostname: "integration-host".to_string(),
            ..Default::default()
        }
    }
}

/// 전송된 알림을 기록하는 notifier mock.
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn failed_line(timestamp: &str, identity: &str) -> String {
    format!(
        "{} - Login attempt: OTP, Unique ID: {}, Status: Failed\n",
        timestamp, identity
    )
}

#[tokio::test]
async fn test_three_failures_produce_exactly_one_alert() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(failed_line("2025-03-01 10:00:01", "UID-AAAA1111").as_bytes())
        .unwrap();
    file.write_all(b"malformed line without markers\n").unwrap();
    file.write_all(failed_line("2025-03-01 10:00:02", "UID-AAAA1111").as_bytes())
        .unwrap();
    file.write_all(failed_line("2025-03-01 10:00:02", "UID-BBBB2222").as_bytes())
        .unwrap();
    file.write_all(failed_line("2025-03-01 10:00:03", "UID-AAAA1111").as_bytes())
        .unwrap();
    file.flush().unwrap();

    let sent = Arc::new(Mutex::new(Vec::new()));
    let (alert_tx, alert_rx) = mpsc::channel(8);
    let dispatcher = AlertDispatcher::new(
        alert_rx,
        Arc::new(StaticEnrichment),
        Arc::new(RecordingNotifier { sent: sent.clone() }),
    );
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    let config = MonitorConfig {
        log_path: file.path().to_path_buf(),
        ..Default::default()
    };
    let engine = AlertEngine::new(
        config.failure_threshold,
        SuppressionPolicy::OncePerRun,
        alert_tx,
    );
    let tailer = LogTailer::open(file.path()).await.unwrap();
    let mut monitor = Monitor::new(config, tailer, engine);

    // 첫 폴링: t1..t3 세 번의 실패로 경고 한 건
    monitor.poll_once().await.unwrap();
    assert_eq!(monitor.stats().alerts_enqueued, 1);
    assert_eq!(monitor.stats().parse_anomalies, 1);

    // 같은 ID의 네 번째 실패는 재경고하지 않음
    let mut handle = file.reopen().unwrap();
    use std::io::Seek;
    handle.seek(std::io::SeekFrom::End(0)).unwrap();
    handle
        .write_all(failed_line("2025-03-01 10:00:04", "UID-AAAA1111").as_bytes())
        .unwrap();
    monitor.poll_once().await.unwrap();
    assert_eq!(monitor.stats().alerts_enqueued, 1);

    // 엔진 drop으로 채널이 닫히면 워커가 남은 경고를 처리하고 종료
    drop(monitor);
    let dispatched = dispatcher_handle.await.unwrap();
    assert_eq!(dispatched, 1);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let notification = &sent[0];
    assert_eq!(
        notification.context.as_ref().unwrap().hostname,
        "integration-host"
    );
    match &notification.event {
        NotificationEvent::FailedLoginBurst {
            identity,
            timestamp,
        } => {
            assert_eq!(identity, "UID-AAAA1111");
            // 경고는 윈도우를 채운 세 번째 라인의 타임스탬프를 실음
            assert_eq!(timestamp, "2025-03-01 10:00:03");
        }
        other => panic!("unexpected event: {:?}", other),
    }
}
