//! 텔레그램 알림 서비스.
//!
//! Telegram Bot API를 통해 보안 경고 알림을 고정된 운영자 채팅으로 전송합니다.
//! 전송 실패는 호출 측에서 로그만 남기고 재시도하지 않습니다.

use crate::types::{
    Notification, NotificationError, NotificationEvent, NotificationPriority, NotificationResult,
    NotificationSender,
};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// 텔레그램 알림 전송 설정.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: String,
    /// 경고를 수신하는 운영자 채팅 ID
    pub chat_id: String,
    /// 전송 활성화 여부
    pub enabled: bool,
    /// 파싱 모드 (HTML 또는 MarkdownV2)
    pub parse_mode: String,
    /// Bot API base URL (테스트용 재정의 가능)
    pub api_base: String,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            enabled: true,
            parse_mode: "HTML".to_string(),
            api_base: "https://api.telegram.org".to_string(),
        }
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// `TELEGRAM_BOT_TOKEN` 또는 `TELEGRAM_CHAT_ID`가 없으면 `None`을
    /// 반환합니다. 시작 시 필수 여부 판단은 호출 측 책임입니다.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        let enabled = std::env::var("TELEGRAM_ENABLED")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        Some(Self {
            enabled,
            ..Self::new(bot_token, chat_id)
        })
    }
}

/// 텔레그램 알림 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 환경 변수에서 전송기를 생성합니다.
    pub fn from_env() -> Option<Self> {
        TelegramConfig::from_env().map(Self::new)
    }

    /// 알림을 텔레그램 메시지로 포맷합니다.
    fn format_message(&self, notification: &Notification) -> String {
        let priority_emoji = match notification.priority {
            NotificationPriority::Low => "ℹ️",
            NotificationPriority::Normal => "📊",
            NotificationPriority::High => "⚠️",
            NotificationPriority::Critical => "🚨",
        };

        let content = match &notification.event {
            NotificationEvent::FailedLoginBurst {
                identity,
                timestamp,
            } => {
                let context_block = match &notification.context {
                    Some(context) => format!("\n\n🖥 <b>시스템 정보</b>\n{context}"),
                    None => String::new(),
                };
                format!(
                    "{priority_emoji} <b>보안 경고: 연속 로그인 실패 감지</b>\n\n\
                     다음 Unique ID에서 <b>3회 연속 로그인 실패</b>가 감지되었습니다:\n\
                     - Unique ID: <code>{identity}</code>\n\
                     - 타임스탬프: {timestamp}{context_block}\n\n\
                     즉시 확인이 필요합니다."
                )
            }

            NotificationEvent::Custom { title, message } => {
                format!("{priority_emoji} <b>{title}</b>\n\n{message}")
            }
        };

        let timestamp = notification.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
        format!("{content}\n\n<i>🕐 {timestamp}</i>")
    }

    /// 텔레그램에 원시 메시지를 전송합니다.
    async fn send_message(&self, text: &str) -> NotificationResult<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        );

        let params = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": self.config.parse_mode,
            "disable_web_page_preview": true,
        });

        debug!(chat_id = %self.config.chat_id, "텔레그램 메시지 전송 시도");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            info!("텔레그램 알림 전송 성공");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                warn!("텔레그램 요청 한도 초과");
                return Err(NotificationError::RateLimited(60));
            }

            error!(status = %status, body = %body, "텔레그램 메시지 전송 실패");
            Err(NotificationError::SendFailed(format!(
                "HTTP {}: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("텔레그램 알림이 비활성화되어 있어 건너뜁니다");
            return Ok(());
        }

        let message = self.format_message(notification);
        self.send_message(&message).await
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
