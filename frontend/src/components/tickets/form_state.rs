//! 售票表单状态管理模块
//!
//! 将零散的 signal 整合为 `IssueForm` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换

use leptos::prelude::*;
use metro_shared::{IssueTicketRequest, TicketType};

/// 售票表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct IssueForm {
    pub ticket_type: RwSignal<TicketType>,
    pub origin: RwSignal<String>,
    pub destination: RwSignal<String>,
    pub passenger: RwSignal<String>,
}

impl IssueForm {
    pub fn new() -> Self {
        Self {
            ticket_type: RwSignal::new(TicketType::default()),
            origin: RwSignal::new(String::new()),
            destination: RwSignal::new(String::new()),
            passenger: RwSignal::new(String::new()),
        }
    }

    pub fn reset(&self) {
        self.ticket_type.set(TicketType::default());
        self.origin.set(String::new());
        self.destination.set(String::new());
        self.passenger.set(String::new());
    }

    pub fn to_request(&self) -> IssueTicketRequest {
        build_request(
            self.ticket_type.get(),
            &self.origin.get(),
            &self.destination.get(),
            &self.passenger.get(),
        )
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// 空白输入视为未填写；不需要终点站的票种忽略终点输入
pub fn build_request(
    ticket_type: TicketType,
    origin: &str,
    destination: &str,
    passenger: &str,
) -> IssueTicketRequest {
    IssueTicketRequest {
        ticket_type,
        origin_station_id: origin.trim().to_string(),
        destination_station_id: if ticket_type.requires_destination() {
            optional(destination)
        } else {
            None
        },
        passenger_id: optional(passenger),
    }
}

/// 票种下拉框的值
pub fn ticket_type_value(ticket_type: TicketType) -> &'static str {
    match ticket_type {
        TicketType::SingleJourney => "single",
        TicketType::DayPass => "day",
        TicketType::Monthly => "monthly",
    }
}

pub fn parse_ticket_type(value: &str) -> TicketType {
    TicketType::ALL
        .into_iter()
        .find(|t| ticket_type_value(*t) == value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_journey_keeps_destination() {
        let req = build_request(TicketType::SingleJourney, " s1 ", "s2", "");
        assert_eq!(req.origin_station_id, "s1");
        assert_eq!(req.destination_station_id.as_deref(), Some("s2"));
        assert_eq!(req.passenger_id, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn passes_drop_destination() {
        let req = build_request(TicketType::DayPass, "s1", "s2", "p9");
        assert_eq!(req.destination_station_id, None);
        assert_eq!(req.passenger_id.as_deref(), Some("p9"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_destination_fails_validation_for_single_journey() {
        let req = build_request(TicketType::SingleJourney, "s1", "  ", "");
        assert!(req.validate().is_err());
    }

    #[test]
    fn select_values_map_back_to_types() {
        for t in TicketType::ALL {
            assert_eq!(parse_ticket_type(ticket_type_value(t)), t);
        }
        assert_eq!(parse_ticket_type("bogus"), TicketType::SingleJourney);
    }
}
