use crate::{Line, Passenger, StaffUser, Station, StatisticsSummary, Ticket, TicketType};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 会改变服务端状态的请求需要携带防伪令牌
    pub fn is_state_changing(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The payload type carried in `data` of the response envelope.
    type Response: DeserializeOwned;
    /// The URL path.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Response Envelope
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMeta {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 后端统一响应包装：`{ meta: { status, message? }, data? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub meta: ApiMeta,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.meta.status)
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 登录与 OAuth 校验共用的响应数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub staff: Option<StaffUser>,
}

impl ApiRequest for LoginRequest {
    type Response = LoginData;
    const PATH: &'static str = "/v1/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = IgnoredAny;
    const PATH: &'static str = "/v1/auth/logout";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// OAuth 回调参数，交由后端校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthValidateRequest {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl ApiRequest for OAuthValidateRequest {
    type Response = LoginData;
    const PATH: &'static str = "/v1/auth/oauth2/validate";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 防伪令牌接口直接返回 `{ token }`，不走统一包装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfTokenResponse {
    pub token: String,
}

// =========================================================
// Resources
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTarget {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListLinesRequest;

impl ApiRequest for ListLinesRequest {
    type Response = Vec<Line>;
    const PATH: &'static str = "/v1/lines";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLineRequest {
    pub code: String,
    pub name: String,
    pub color: String,
}

impl CreateLineRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("线路编号不能为空".into());
        }
        if self.name.trim().is_empty() {
            return Err("线路名称不能为空".into());
        }
        let hex = self.color.strip_prefix('#').unwrap_or_default();
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("线路颜色须为 #RRGGBB 格式".into());
        }
        Ok(())
    }
}

impl ApiRequest for CreateLineRequest {
    type Response = Line;
    const PATH: &'static str = "/v1/lines";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteLineRequest(pub DeleteTarget);

impl ApiRequest for DeleteLineRequest {
    type Response = IgnoredAny;
    const PATH: &'static str = "/v1/lines";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStationsRequest;

impl ApiRequest for ListStationsRequest {
    type Response = Vec<Station>;
    const PATH: &'static str = "/v1/stations";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStationRequest {
    pub code: String,
    pub name: String,
    pub line_id: String,
}

impl CreateStationRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("站点编号不能为空".into());
        }
        if self.name.trim().is_empty() {
            return Err("站点名称不能为空".into());
        }
        if self.line_id.trim().is_empty() {
            return Err("请选择所属线路".into());
        }
        Ok(())
    }
}

impl ApiRequest for CreateStationRequest {
    type Response = Station;
    const PATH: &'static str = "/v1/stations";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteStationRequest(pub DeleteTarget);

impl ApiRequest for DeleteStationRequest {
    type Response = IgnoredAny;
    const PATH: &'static str = "/v1/stations";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStaffRequest;

impl ApiRequest for ListStaffRequest {
    type Response = Vec<StaffUser>;
    const PATH: &'static str = "/v1/staff";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListTicketsRequest;

impl ApiRequest for ListTicketsRequest {
    type Response = Vec<Ticket>;
    const PATH: &'static str = "/v1/tickets";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueTicketRequest {
    pub ticket_type: TicketType,
    pub origin_station_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_id: Option<String>,
}

impl IssueTicketRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.origin_station_id.trim().is_empty() {
            return Err("请选择起点站".into());
        }
        match (&self.destination_station_id, self.ticket_type.requires_destination()) {
            (None, true) => Err("单程票需要选择终点站".into()),
            (Some(dest), true) if dest == &self.origin_station_id => {
                Err("起点站与终点站不能相同".into())
            }
            _ => Ok(()),
        }
    }
}

impl ApiRequest for IssueTicketRequest {
    type Response = Ticket;
    const PATH: &'static str = "/v1/tickets";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListPassengersRequest;

impl ApiRequest for ListPassengersRequest {
    type Response = Vec<Passenger>;
    const PATH: &'static str = "/v1/passengers";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsSummaryRequest;

impl ApiRequest for StatisticsSummaryRequest {
    type Response = StatisticsSummary;
    const PATH: &'static str = "/v1/statistics/summary";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn login_envelope_with_staff_parses() {
        let json = r#"{"meta":{"status":200},"data":{"staff":{"id":"1","username":"wang","role":"ADMIN"}}}"#;
        let envelope: ApiEnvelope<LoginData> = serde_json::from_str(json).unwrap();
        assert!(envelope.is_success());
        let staff = envelope.data.unwrap().staff.unwrap();
        assert_eq!(staff.role, Role::Admin);
    }

    #[test]
    fn envelope_without_data_parses_as_none() {
        let json = r#"{"meta":{"status":401,"message":"bad credentials"}}"#;
        let envelope: ApiEnvelope<LoginData> = serde_json::from_str(json).unwrap();
        assert!(!envelope.is_success());
        assert!(envelope.data.is_none());
        assert_eq!(envelope.meta.message.as_deref(), Some("bad credentials"));
    }

    #[test]
    fn ignored_payload_accepts_any_data() {
        let json = r#"{"meta":{"status":200},"data":{"whatever":[1,2,3]}}"#;
        let envelope: ApiEnvelope<IgnoredAny> = serde_json::from_str(json).unwrap();
        assert!(envelope.is_success());
    }

    #[test]
    fn login_request_debug_hides_password() {
        let req = LoginRequest {
            email: "a@metro.cn".into(),
            password: "hunter2".into(),
        };
        let printed = format!("{req:?}");
        assert!(printed.contains("a@metro.cn"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn only_get_is_side_effect_free() {
        assert!(!HttpMethod::Get.is_state_changing());
        assert!(HttpMethod::Post.is_state_changing());
        assert!(HttpMethod::Delete.is_state_changing());
    }

    #[test]
    fn line_color_must_be_hex() {
        let mut req = CreateLineRequest {
            code: "L1".into(),
            name: "1号线".into(),
            color: "#C23A30".into(),
        };
        assert!(req.validate().is_ok());
        req.color = "red".into();
        assert!(req.validate().is_err());
        req.color = "#12345G".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn single_journey_needs_distinct_destination() {
        let mut req = IssueTicketRequest {
            ticket_type: TicketType::SingleJourney,
            origin_station_id: "st1".into(),
            destination_station_id: None,
            passenger_id: None,
        };
        assert!(req.validate().is_err());
        req.destination_station_id = Some("st1".into());
        assert!(req.validate().is_err());
        req.destination_station_id = Some("st2".into());
        assert!(req.validate().is_ok());

        req.ticket_type = TicketType::DayPass;
        req.destination_station_id = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn station_requires_line() {
        let req = CreateStationRequest {
            code: "GM".into(),
            name: "国贸".into(),
            line_id: " ".into(),
        };
        assert_eq!(req.validate().unwrap_err(), "请选择所属线路");
    }
}
