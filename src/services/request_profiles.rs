use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::events::RequestKind;

/// Профиль оповещения для вида запроса: заголовок и тексты уведомлений,
/// уходящих медперсоналу и на устройство пациента
#[derive(Debug, Clone, Copy)]
pub struct RequestProfile {
    /// Заголовок push-уведомления для персонала
    pub staff_title: &'static str,
    /// Текст push-уведомления для персонала
    pub staff_body: &'static str,
    /// Текст локального подтверждения на устройстве пациента
    pub local_body: &'static str,
    /// Срочность: экстренные запросы не должны теряться в общем потоке
    pub urgent: bool,
}

/// Маппинг видов запросов на профили оповещений
pub struct RequestProfiles;

// Статическая карта профилей; тексты соответствуют исходной панели запросов
static PROFILES: Lazy<HashMap<RequestKind, RequestProfile>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        RequestKind::Ice,
        RequestProfile {
            staff_title: "Ice Request",
            staff_body: "A patient is requesting ice.",
            local_body: "Ice button was clicked!",
            urgent: false,
        },
    );
    map.insert(
        RequestKind::Food,
        RequestProfile {
            staff_title: "Food Request",
            staff_body: "A patient is requesting food.",
            local_body: "Food button was clicked!",
            urgent: false,
        },
    );
    map.insert(
        RequestKind::Water,
        RequestProfile {
            staff_title: "Water Request",
            staff_body: "A patient is requesting water.",
            local_body: "Water button was clicked!",
            urgent: false,
        },
    );
    map.insert(
        RequestKind::Medication,
        RequestProfile {
            staff_title: "Medication Request",
            staff_body: "A patient is requesting medication.",
            local_body: "Medication button was clicked!",
            urgent: true,
        },
    );
    map.insert(
        RequestKind::Bathroom,
        RequestProfile {
            staff_title: "Bathroom Request",
            staff_body: "A patient is requesting bathroom assistance.",
            local_body: "Bathroom button was clicked!",
            urgent: false,
        },
    );
    map.insert(
        RequestKind::Lights,
        RequestProfile {
            staff_title: "Lights Request",
            staff_body: "A patient is requesting the lights be adjusted.",
            local_body: "Lights button was clicked!",
            urgent: false,
        },
    );
    map.insert(
        RequestKind::Message,
        RequestProfile {
            staff_title: "New Voice Message",
            staff_body: "A patient recorded a voice message.",
            local_body: "Message Recorded",
            urgent: false,
        },
    );
    map.insert(
        RequestKind::EmergencyCall,
        RequestProfile {
            staff_title: "Emergency Call",
            staff_body: "A patient is attempting to make an emergency call",
            local_body: "Initiating phone call...",
            urgent: true,
        },
    );

    map
});

impl RequestProfiles {
    pub fn get(kind: RequestKind) -> &'static RequestProfile {
        // Карта покрывает все варианты enum, см. тест полноты
        &PROFILES[&kind]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_have_profiles() {
        let kinds = [
            RequestKind::Ice,
            RequestKind::Food,
            RequestKind::Water,
            RequestKind::Medication,
            RequestKind::Bathroom,
            RequestKind::Lights,
            RequestKind::Message,
            RequestKind::EmergencyCall,
        ];

        for kind in kinds {
            let profile = RequestProfiles::get(kind);
            assert!(!profile.staff_title.is_empty());
            assert!(!profile.staff_body.is_empty());
        }
    }

    #[test]
    fn test_emergency_is_urgent() {
        assert!(RequestProfiles::get(RequestKind::EmergencyCall).urgent);
        assert!(!RequestProfiles::get(RequestKind::Water).urgent);
    }
}
