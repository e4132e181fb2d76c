use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

pub use date::Timestamp;
pub use protocol::*;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_CSRF_TOKEN: &str = "X-CSRF-Token";
pub const CSRF_TOKEN_PATH: &str = "/v1/auth/csrf-token";
pub const OAUTH_CALLBACK_PATH: &str = "/OAuth2/callback";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 员工角色
///
/// 线上格式为 `SCREAMING_SNAKE_CASE`，无法识别的值一律视为 `Guest`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    MasterAdmin,
    Operator,
    TicketAgent,
    Passenger,
    #[default]
    #[serde(other)]
    Guest,
}

impl Role {
    /// 管理员类角色（含超级管理员）
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::MasterAdmin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "管理员",
            Role::MasterAdmin => "超级管理员",
            Role::Operator => "运营调度",
            Role::TicketAgent => "售票员",
            Role::Passenger => "乘客",
            Role::Guest => "访客",
        }
    }
}

/// 后端返回的员工信息（登录响应中的 `staff` 字段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineStatus {
    #[default]
    Operational,
    Suspended,
    Maintenance,
}

impl LineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LineStatus::Operational => "运营中",
            LineStatus::Suspended => "停运",
            LineStatus::Maintenance => "检修中",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub code: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub status: LineStatus,
    #[serde(default)]
    pub station_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub line_ids: Vec<String>,
}

impl Station {
    /// 换乘站：至少两条线路经过
    pub fn is_transfer(&self) -> bool {
        self.line_ids.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    #[default]
    SingleJourney,
    DayPass,
    Monthly,
}

impl TicketType {
    pub const ALL: [TicketType; 3] = [
        TicketType::SingleJourney,
        TicketType::DayPass,
        TicketType::Monthly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketType::SingleJourney => "单程票",
            TicketType::DayPass => "日票",
            TicketType::Monthly => "月票",
        }
    }

    /// 单程票需要终点站，其余票种不需要
    pub fn requires_destination(&self) -> bool {
        matches!(self, TicketType::SingleJourney)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Active,
    Used,
    Refunded,
    Expired,
}

impl TicketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Active => "有效",
            TicketStatus::Used => "已使用",
            TicketStatus::Refunded => "已退票",
            TicketStatus::Expired => "已过期",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub ticket_type: TicketType,
    pub origin_station_id: String,
    #[serde(default)]
    pub destination_station_id: Option<String>,
    #[serde(default)]
    pub passenger_id: Option<String>,
    pub price_cents: u64,
    pub issued_at: Timestamp,
    #[serde(default)]
    pub status: TicketStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    pub registered_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRidership {
    pub line_id: String,
    pub line_name: String,
    pub riders: u64,
}

/// 运营统计汇总
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total_passengers: u64,
    pub tickets_sold_today: u64,
    pub revenue_today_cents: u64,
    pub active_lines: u32,
    #[serde(default)]
    pub line_ridership: Vec<LineRidership>,
}

impl StatisticsSummary {
    /// 客流最高的线路；并列时取先出现者
    pub fn busiest_line(&self) -> Option<&LineRidership> {
        self.line_ridership
            .iter()
            .reduce(|best, next| if next.riders > best.riders { next } else { best })
    }

    /// 各线路客流占比（百分比，保留整数）
    pub fn ridership_share(&self, line: &LineRidership) -> u8 {
        let total: u64 = self.line_ridership.iter().map(|l| l.riders).sum();
        if total == 0 {
            return 0;
        }
        ((line.riders * 100 + total / 2) / total).min(100) as u8
    }
}

/// 以“元.角分”格式展示金额
pub fn format_amount(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_format_round_trips_known_values() {
        let role: Role = serde_json::from_str("\"TICKET_AGENT\"").unwrap();
        assert_eq!(role, Role::TicketAgent);
        assert_eq!(
            serde_json::to_string(&Role::MasterAdmin).unwrap(),
            "\"MASTER_ADMIN\""
        );
    }

    #[test]
    fn unknown_role_falls_back_to_guest() {
        let role: Role = serde_json::from_str("\"JANITOR\"").unwrap();
        assert_eq!(role, Role::Guest);
        assert_eq!(Role::default(), Role::Guest);
    }

    #[test]
    fn staff_without_role_is_guest() {
        let staff: StaffUser =
            serde_json::from_str(r#"{"id":"s1","username":"li"}"#).unwrap();
        assert_eq!(staff.role, Role::Guest);
        assert!(staff.email.is_none());
    }

    #[test]
    fn busiest_line_prefers_first_on_tie() {
        let summary = StatisticsSummary {
            line_ridership: vec![
                LineRidership {
                    line_id: "l1".into(),
                    line_name: "1号线".into(),
                    riders: 300,
                },
                LineRidership {
                    line_id: "l2".into(),
                    line_name: "2号线".into(),
                    riders: 300,
                },
                LineRidership {
                    line_id: "l3".into(),
                    line_name: "3号线".into(),
                    riders: 100,
                },
            ],
            ..Default::default()
        };
        assert_eq!(summary.busiest_line().unwrap().line_id, "l1");
        assert_eq!(summary.ridership_share(&summary.line_ridership[0]), 43);
        assert_eq!(summary.ridership_share(&summary.line_ridership[2]), 14);
    }

    #[test]
    fn ridership_share_of_empty_summary_is_zero() {
        let summary = StatisticsSummary::default();
        let line = LineRidership {
            line_id: "l1".into(),
            line_name: "1号线".into(),
            riders: 0,
        };
        assert!(summary.busiest_line().is_none());
        assert_eq!(summary.ridership_share(&line), 0);
    }

    #[test]
    fn amount_formatting_pads_cents() {
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(305), "3.05");
        assert_eq!(format_amount(120_000), "1200.00");
    }

    #[test]
    fn transfer_station_needs_two_lines() {
        let mut station = Station {
            id: "st1".into(),
            code: "XZM".into(),
            name: "西直门".into(),
            line_ids: vec!["l2".into()],
        };
        assert!(!station.is_transfer());
        station.line_ids.push("l4".into());
        assert!(station.is_transfer());
    }
}
