//! 경고 알림에 첨부되는 시스템 컨텍스트 수집.
//!
//! 호스트명, 내부/외부 IP, MAC 주소, 운영체제, 로그인 사용자, 위치(ISP 포함),
//! 시스템 업타임을 수집합니다. 모든 항목은 best-effort로 조회되며, 개별 조회가
//! 실패해도 전체 수집은 실패하지 않고 placeholder 값이 채워집니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sysinfo::{MacAddr, Networks, System};
use tracing::debug;

/// 알 수 없는 값의 기본 placeholder.
const UNKNOWN: &str = "Unknown";

/// 수집된 시스템 컨텍스트.
///
/// 모든 필드는 항상 표시 가능한 문자열로 채워집니다. 조회 실패 시
/// `"Unknown"` 또는 실패 사유를 설명하는 문자열이 들어갑니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemContext {
    /// 호스트명
    pub hostname: String,
    /// 내부 네트워크 IP 주소
    pub local_ip: String,
    /// 외부에서 관측되는 IP 주소
    pub public_ip: String,
    /// 링크 계층 MAC 주소
    pub mac_address: String,
    /// 운영체제 설명 (이름 + 버전)
    pub os: String,
    /// 현재 로그인 사용자
    pub user: String,
    /// 위치 (도시, 지역, 국가)
    pub location: String,
    /// 네트워크 사업자 (ISP)
    pub isp: String,
    /// 시스템 업타임
    pub uptime: String,
}

impl Default for SystemContext {
    fn default() -> Self {
        Self {
            hostname: UNKNOWN.to_string(),
            local_ip: UNKNOWN.to_string(),
            public_ip: UNKNOWN.to_string(),
            mac_address: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
            user: UNKNOWN.to_string(),
            location: UNKNOWN.to_string(),
            isp: UNKNOWN.to_string(),
            uptime: UNKNOWN.to_string(),
        }
    }
}

impl std::fmt::Display for SystemContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "호스트명: {}\n\
             내부 IP: {}\n\
             외부 IP: {}\n\
             MAC 주소: {}\n\
             운영체제: {}\n\
             로그인 사용자: {}\n\
             위치: {}\n\
             ISP: {}\n\
             시스템 업타임: {}",
            self.hostname,
            self.local_ip,
            self.public_ip,
            self.mac_address,
            self.os,
            self.user,
            self.location,
            self.isp,
            self.uptime
        )
    }
}

/// 시스템 컨텍스트 수집 provider trait.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// 시스템 컨텍스트를 수집합니다. 절대 실패하지 않습니다.
    async fn collect(&self) -> SystemContext;
}

/// Enrichment 조회 설정.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// 외부 조회당 타임아웃 (초)
    pub timeout_seconds: u64,
    /// 외부 IP 조회 1차 endpoint
    pub ip_primary_url: String,
    /// 외부 IP 조회 fallback endpoint
    pub ip_fallback_url: String,
    /// 위치 조회 endpoint (base, `/{ip}/json` 형태로 호출)
    pub geo_base_url: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            ip_primary_url: "https://api64.ipify.org?format=text".to_string(),
            ip_fallback_url: "https://ifconfig.me/ip".to_string(),
            geo_base_url: "https://ipinfo.io".to_string(),
        }
    }
}

impl EnrichmentConfig {
    /// 환경 변수에서 설정을 생성합니다.
    pub fn from_env() -> Self {
        let timeout_seconds = std::env::var("ENRICHMENT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Self {
            timeout_seconds,
            ..Default::default()
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// 로컬 시스템과 외부 HTTPS 조회를 사용하는 기본 enrichment provider.
pub struct SystemEnrichment {
    config: EnrichmentConfig,
    client: reqwest::Client,
}

impl SystemEnrichment {
    /// 새 enrichment provider를 생성합니다.
    pub fn new(config: EnrichmentConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 외부 IP를 조회합니다 (1차 실패 시 fallback 사용).
    async fn fetch_public_ip(&self) -> Option<String> {
        if let Some(ip) = self.fetch_text(&self.config.ip_primary_url).await {
            return Some(ip);
        }
        debug!("1차 외부 IP 조회 실패, fallback 시도");
        self.fetch_text(&self.config.ip_fallback_url).await
    }

    /// 외부 IP 기반 위치와 ISP를 조회합니다.
    async fn fetch_geolocation(&self, public_ip: &str) -> Option<(String, String)> {
        let url = format!("{}/{}/json", self.config.geo_base_url, public_ip);
        let response = self
            .client
            .get(&url)
            .timeout(self.config.timeout())
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let geo: serde_json::Value = response.json().await.ok()?;
        let field = |key: &str| {
            geo.get(key)
                .and_then(|v| v.as_str())
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        let location = format!("{}, {}, {}", field("city"), field("region"), field("country"));
        let isp = geo
            .get("org")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown ISP")
            .to_string();

        Some((location, isp))
    }

    async fn fetch_text(&self, url: &str) -> Option<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout())
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let body = response.text().await.ok()?;
        let trimmed = body.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[async_trait]
impl EnrichmentProvider for SystemEnrichment {
    async fn collect(&self) -> SystemContext {
        let mut context = SystemContext {
            hostname: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
            local_ip: local_ip().unwrap_or_else(|| UNKNOWN.to_string()),
            mac_address: mac_address().unwrap_or_else(|| UNKNOWN.to_string()),
            os: os_descriptor(),
            user: current_user(),
            uptime: format_uptime(System::uptime()),
            ..Default::default()
        };

        match self.fetch_public_ip().await {
            Some(ip) => {
                match self.fetch_geolocation(&ip).await {
                    Some((location, isp)) => {
                        context.location = location;
                        context.isp = isp;
                    }
                    None => {
                        context.location = "위치 확인 실패".to_string();
                        context.isp = "ISP 확인 실패".to_string();
                    }
                }
                context.public_ip = ip;
            }
            None => {
                context.public_ip = "외부 IP 확인 실패".to_string();
                context.location = "위치 확인 실패".to_string();
                context.isp = "ISP 확인 실패".to_string();
            }
        }

        debug!(hostname = %context.hostname, public_ip = %context.public_ip, "시스템 컨텍스트 수집 완료");
        context
    }
}

/// UDP 소켓 연결 트릭으로 내부 IP를 확인합니다 (패킷 전송 없음).
fn local_ip() -> Option<String> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip().to_string())
}

/// 첫 번째 유효한 네트워크 인터페이스의 MAC 주소를 반환합니다.
fn mac_address() -> Option<String> {
    let networks = Networks::new_with_refreshed_list();
    networks
        .iter()
        .map(|(_, data)| data.mac_address())
        .find(|mac| *mac != MacAddr::UNSPECIFIED)
        .map(|mac| mac.to_string())
}

/// 운영체제 이름과 버전 설명.
fn os_descriptor() -> String {
    let name = System::name().unwrap_or_else(|| UNKNOWN.to_string());
    match System::os_version() {
        Some(version) => format!("{} {}", name, version),
        None => name,
    }
}

/// 현재 로그인 사용자.
fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// 업타임(초)을 `N일 HH:MM:SS` 형식으로 변환합니다.
fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{}일 {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrichment_with(server: &mockito::ServerGuard) -> SystemEnrichment {
        SystemEnrichment::new(EnrichmentConfig {
            timeout_seconds: 2,
            ip_primary_url: format!("{}/primary", server.url()),
            ip_fallback_url: format!("{}/fallback", server.url()),
            geo_base_url: server.url(),
        })
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "00:00:59");
        assert_eq!(format_uptime(3_661), "01:01:01");
        assert_eq!(format_uptime(90_061), "1일 01:01:01");
    }

    #[test]
    fn test_default_context_is_displayable() {
        let context = SystemContext::default();
        let rendered = context.to_string();
        assert!(rendered.contains("호스트명: Unknown"));
        assert!(rendered.contains("시스템 업타임: Unknown"));
    }

    #[tokio::test]
    async fn test_public_ip_fallback_on_primary_failure() {
        let mut server = mockito::Server::new_async().await;
        let _primary = server
            .mock("GET", "/primary")
            .with_status(500)
            .create_async()
            .await;
        let _fallback = server
            .mock("GET", "/fallback")
            .with_status(200)
            .with_body("203.0.113.7\n")
            .create_async()
            .await;

        let enrichment = enrichment_with(&server);
        assert_eq!(
            enrichment.fetch_public_ip().await,
            Some("203.0.113.7".to_string())
        );
    }

    #[tokio::test]
    async fn test_geolocation_parse() {
        let mut server = mockito::Server::new_async().await;
        let _geo = server
            .mock("GET", "/203.0.113.7/json")
            .with_status(200)
            .with_body(r#"{"city":"Seoul","region":"Seoul","country":"KR","org":"AS4766 Korea Telecom"}"#)
            .create_async()
            .await;

        let enrichment = enrichment_with(&server);
        let (location, isp) = enrichment.fetch_geolocation("203.0.113.7").await.unwrap();
        assert_eq!(location, "Seoul, Seoul, KR");
        assert_eq!(isp, "AS4766 Korea Telecom");
    }

    #[tokio::test]
    async fn test_lookup_failure_yields_placeholders() {
        let mut server = mockito::Server::new_async().await;
        let _primary = server
            .mock("GET", "/primary")
            .with_status(503)
            .create_async()
            .await;
        let _fallback = server
            .mock("GET", "/fallback")
            .with_status(503)
            .create_async()
            .await;

        let enrichment = enrichment_with(&server);
        let context = enrichment.collect().await;

        // 외부 조회가 전부 실패해도 표시 가능한 구조가 반환됨
        assert_eq!(context.public_ip, "외부 IP 확인 실패");
        assert_eq!(context.location, "위치 확인 실패");
        assert_eq!(context.isp, "ISP 확인 실패");
        assert!(!context.uptime.is_empty());
    }
}
