use crate::debug_if_enabled;
use crate::events::CursorPosition;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Идентификатор подписки на позицию курсора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type PositionCallback = Arc<dyn Fn(CursorPosition) + Send + Sync>;

/// CursorBroadcaster: единственная авторитетная позиция курсора.
///
/// Зоны ответственности (строго):
/// - Хранить последнюю известную позицию; истории нет.
/// - Синхронно уведомлять подписчиков о каждом обновлении.
/// - НЕ интерпретировать координаты: значения вне экрана просто означают
///   "курсор ни над одной целью", решения принимают dwell-детекторы.
///
/// Ровно один писатель (путь приёма кадров взгляда), много читателей.
/// Коллбеки вызываются без удержания блокировок, чтобы подписчик мог
/// безопасно перечитать позицию или отписаться изнутри уведомления.
pub struct CursorBroadcaster {
    position: RwLock<CursorPosition>,
    subscribers: DashMap<u64, PositionCallback>,
    next_id: AtomicU64,
}

impl Default for CursorBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorBroadcaster {
    pub fn new() -> Self {
        Self {
            position: RwLock::new(CursorPosition::default()),
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Безусловно перезаписать текущую позицию и уведомить подписчиков.
    /// Порядок обхода подписчиков не специфицирован.
    pub fn update(&self, x: f64, y: f64) {
        let pos = CursorPosition::new(x, y);
        *self.position.write() = pos;

        debug_if_enabled!("Курсор обновлён: {}", pos);

        // Снимок коллбеков до вызова: отписка изнутри уведомления не должна
        // ломать доставку остальным
        let callbacks: Vec<PositionCallback> = self
            .subscribers
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for callback in callbacks {
            callback(pos);
        }
    }

    /// Текущий снимок позиции. Не блокирует и не может завершиться ошибкой.
    pub fn read(&self) -> CursorPosition {
        *self.position.read()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(CursorPosition) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, Arc::new(callback));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(&id.0);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[test]
    fn test_update_overwrites_position() {
        let broadcaster = CursorBroadcaster::new();
        assert_eq!(broadcaster.read(), CursorPosition::default());

        broadcaster.update(10.0, 20.0);
        broadcaster.update(-5.0, 9999.0); // вне экрана — тоже валидно
        assert_eq!(broadcaster.read(), CursorPosition::new(-5.0, 9999.0));
    }

    #[test]
    fn test_subscribers_receive_every_update() {
        let broadcaster = CursorBroadcaster::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = Arc::clone(&received);
        broadcaster.subscribe(move |pos| {
            received_clone.lock().unwrap().push(pos);
        });

        broadcaster.update(1.0, 1.0);
        broadcaster.update(2.0, 2.0);

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[1], CursorPosition::new(2.0, 2.0));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let broadcaster = CursorBroadcaster::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        let id = broadcaster.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        broadcaster.update(1.0, 1.0);
        broadcaster.unsubscribe(id);
        broadcaster.update(2.0, 2.0);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_inside_notification_keeps_others() {
        let broadcaster = Arc::new(CursorBroadcaster::new());
        let other_count = Arc::new(AtomicUsize::new(0));

        // Первый подписчик отписывает сам себя при первом же уведомлении
        let self_id = Arc::new(Mutex::new(None));
        let broadcaster_clone = Arc::clone(&broadcaster);
        let self_id_clone = Arc::clone(&self_id);
        let id = broadcaster.subscribe(move |_| {
            if let Some(id) = self_id_clone.lock().unwrap().take() {
                broadcaster_clone.unsubscribe(id);
            }
        });
        *self_id.lock().unwrap() = Some(id);

        let other_clone = Arc::clone(&other_count);
        broadcaster.subscribe(move |_| {
            other_clone.fetch_add(1, Ordering::SeqCst);
        });

        broadcaster.update(1.0, 1.0);
        broadcaster.update(2.0, 2.0);

        // Второй подписчик получил обе волны без пропусков и дублей
        assert_eq!(other_count.load(Ordering::SeqCst), 2);
        assert_eq!(broadcaster.subscriber_count(), 1);
    }

    #[test]
    fn test_read_inside_notification_sees_fresh_position() {
        let broadcaster = Arc::new(CursorBroadcaster::new());
        let seen = Arc::new(Mutex::new(None));

        let broadcaster_clone = Arc::clone(&broadcaster);
        let seen_clone = Arc::clone(&seen);
        broadcaster.subscribe(move |_| {
            *seen_clone.lock().unwrap() = Some(broadcaster_clone.read());
        });

        broadcaster.update(42.0, 7.0);
        assert_eq!(*seen.lock().unwrap(), Some(CursorPosition::new(42.0, 7.0)));
    }
}
