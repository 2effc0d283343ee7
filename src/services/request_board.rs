use crate::config::{BoardConfig, Config, ScreenConfig};
use crate::error::Result;
use crate::events::{TargetBounds, TargetId};
use crate::services::cursor_broadcaster::{CursorBroadcaster, SubscriptionId};
use crate::services::dispatcher::ActionDispatcherTrait;
use crate::services::dwell_detector::{DwellConfig, DwellDetector};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};

/// Одна цель панели: детектор, подписка и место в сетке
/// (None — геометрия задана в конфигурации явно)
struct BoardTarget {
    detector: Arc<DwellDetector>,
    subscription: SubscriptionId,
    grid_slot: Option<usize>,
}

/// RequestBoard: панель запросов пациента.
///
/// Создаёт по dwell-детектору на каждую настроенную цель, раскладывает
/// цели без явной геометрии по сетке, подписывает детекторы на позицию
/// курсора и направляет активации в диспетчер действий. При teardown
/// строго сначала гасит таймеры, затем отписывает детекторы.
pub struct RequestBoard {
    broadcaster: Arc<CursorBroadcaster>,
    targets: Vec<BoardTarget>,
    board: BoardConfig,
    screen: RwLock<ScreenConfig>,
    grid_count: usize,
}

impl RequestBoard {
    pub fn new(
        config: &Config,
        broadcaster: Arc<CursorBroadcaster>,
        dispatcher: Arc<dyn ActionDispatcherTrait>,
    ) -> Result<Self> {
        info!("Инициализация RequestBoard: {} целей", config.targets.len());

        let grid_count = config
            .targets
            .iter()
            .filter(|t| t.bounds.is_none())
            .count();

        let mut targets = Vec::with_capacity(config.targets.len());
        let mut next_slot = 0usize;

        for (index, target_config) in config.targets.iter().enumerate() {
            let (bounds, grid_slot) = match target_config.bounds {
                Some(bounds) => (bounds, None),
                None => {
                    let slot = next_slot;
                    next_slot += 1;
                    (
                        grid_slot_bounds(config.screen, &config.board, slot, grid_count),
                        Some(slot),
                    )
                }
            };

            let dispatcher = Arc::clone(&dispatcher);
            let detector = Arc::new(DwellDetector::new(
                TargetId(index as u32),
                target_config.label.clone(),
                target_config.kind,
                bounds,
                DwellConfig {
                    dwell_duration_ms: config.dwell_duration_for(target_config),
                },
                Arc::new(move |event| {
                    // Побочные эффекты уходят в отдельную задачу: активация
                    // не должна ждать D-Bus
                    let dispatcher = Arc::clone(&dispatcher);
                    tokio::spawn(async move {
                        if let Err(e) = dispatcher.dispatch(&event).await {
                            error!("Не удалось доставить активацию {}: {}", event, e);
                        }
                    });
                }),
            ));

            let detector_clone = Arc::clone(&detector);
            let subscription =
                broadcaster.subscribe(move |pos| detector_clone.handle_cursor_move(pos));

            targets.push(BoardTarget {
                detector,
                subscription,
                grid_slot,
            });
        }

        Ok(Self {
            broadcaster,
            targets,
            board: config.board.clone(),
            screen: RwLock::new(config.screen),
            grid_count,
        })
    }

    /// Пересчитать сетку после изменения размеров экрана.
    /// Цели с явной геометрией не трогаем: её обновляет хост.
    pub fn handle_resize(&self, screen: ScreenConfig) {
        info!(
            "Перекомпоновка панели под экран {}x{}",
            screen.width, screen.height
        );
        *self.screen.write() = screen;

        for target in &self.targets {
            if let Some(slot) = target.grid_slot {
                target
                    .detector
                    .set_bounds(grid_slot_bounds(screen, &self.board, slot, self.grid_count));
            }
        }
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Остановить панель: отменить все взведённые таймеры и отписаться
    /// от курсора, чтобы ни одна активация не выстрелила по снятой цели
    pub fn teardown(&self) {
        info!("Остановка RequestBoard: {} целей", self.targets.len());

        for target in &self.targets {
            target.detector.teardown();
            self.broadcaster.unsubscribe(target.subscription);
        }
    }

    #[cfg(test)]
    fn detector(&self, index: usize) -> &Arc<DwellDetector> {
        &self.targets[index].detector
    }
}

/// Геометрия ячейки сетки: `slot` нумеруется слева направо, сверху вниз
fn grid_slot_bounds(
    screen: ScreenConfig,
    board: &BoardConfig,
    slot: usize,
    grid_count: usize,
) -> TargetBounds {
    let columns = board.columns as usize;
    let rows = grid_count.div_ceil(columns).max(1);

    let cell_width =
        (screen.width - board.margin * (columns as f64 + 1.0)) / columns as f64;
    let cell_height = (screen.height - board.margin * (rows as f64 + 1.0)) / rows as f64;

    let col = slot % columns;
    let row = slot / columns;

    TargetBounds::new(
        board.margin + col as f64 * (cell_width + board.margin),
        board.margin + row as f64 * (cell_height + board.margin),
        cell_width,
        cell_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;
    use crate::events::{ActivationEvent, RequestKind};
    use std::sync::Mutex;
    use tokio::time::Duration;

    /// Диспетчер-самописец для проверки проводки активаций
    struct RecordingDispatcher {
        events: Mutex<Vec<ActivationEvent>>,
    }

    impl RecordingDispatcher {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<ActivationEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ActionDispatcherTrait for RecordingDispatcher {
        async fn dispatch(&self, event: &ActivationEvent) -> Result<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.board.dwell_duration_ms = 1000;
        config.targets = vec![
            TargetConfig {
                label: "Water".to_string(),
                kind: RequestKind::Water,
                dwell_duration_ms: None,
                bounds: None,
            },
            TargetConfig {
                label: "Food".to_string(),
                kind: RequestKind::Food,
                dwell_duration_ms: None,
                bounds: None,
            },
            TargetConfig {
                label: "Call".to_string(),
                kind: RequestKind::EmergencyCall,
                dwell_duration_ms: Some(2000),
                bounds: Some(TargetBounds::new(1160.0, 0.0, 120.0, 800.0)),
            },
        ];
        config
    }

    async fn advance_ms(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_grid_slots_fit_screen_without_overlap() {
        let screen = ScreenConfig {
            width: 1280.0,
            height: 800.0,
        };
        let board = BoardConfig {
            columns: 3,
            margin: 30.0,
            dwell_duration_ms: 4000,
        };

        let cells: Vec<TargetBounds> = (0..7)
            .map(|slot| grid_slot_bounds(screen, &board, slot, 7))
            .collect();

        for cell in &cells {
            assert!(cell.width > 0.0 && cell.height > 0.0);
            assert!(cell.x >= board.margin);
            assert!(cell.x + cell.width <= screen.width - board.margin + 1e-9);
            assert!(cell.y + cell.height <= screen.height - board.margin + 1e-9);
        }

        // Соседние ячейки разделены отступом и не пересекаются
        assert!(cells[0].x + cells[0].width < cells[1].x);
        assert!(cells[0].y + cells[0].height < cells[3].y);

        // Слоты 0 и 3 в одной колонке, 0 и 1 в одной строке
        assert_eq!(cells[0].x, cells[3].x);
        assert_eq!(cells[0].y, cells[1].y);
    }

    #[tokio::test(start_paused = true)]
    async fn test_board_routes_activation_to_dispatcher() {
        let config = test_config();
        let broadcaster = Arc::new(CursorBroadcaster::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());

        let board = RequestBoard::new(
            &config,
            Arc::clone(&broadcaster),
            Arc::clone(&dispatcher) as Arc<dyn ActionDispatcherTrait>,
        )
        .unwrap();
        assert_eq!(board.target_count(), 3);

        // Наводим курсор в центр первой ячейки и выдерживаем порог
        let cell = board.detector(0).bounds();
        broadcaster.update(cell.x + cell.width / 2.0, cell.y + cell.height / 2.0);
        advance_ms(1000).await;

        let events = dispatcher.recorded();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RequestKind::Water);
        assert_eq!(events[0].dwell_ms, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_bounds_and_dwell_override() {
        let config = test_config();
        let broadcaster = Arc::new(CursorBroadcaster::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());

        let board = RequestBoard::new(
            &config,
            Arc::clone(&broadcaster),
            Arc::clone(&dispatcher) as Arc<dyn ActionDispatcherTrait>,
        )
        .unwrap();

        // Боковая кнопка вызова: явная геометрия, порог 2000мс
        broadcaster.update(1200.0, 400.0);
        advance_ms(1000).await;
        assert!(dispatcher.recorded().is_empty());

        advance_ms(1000).await;
        let events = dispatcher.recorded();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RequestKind::EmergencyCall);
        assert_eq!(events[0].dwell_ms, 2000);

        board.teardown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_moves_grid_targets_only() {
        let config = test_config();
        let broadcaster = Arc::new(CursorBroadcaster::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());

        let board = RequestBoard::new(
            &config,
            Arc::clone(&broadcaster),
            Arc::clone(&dispatcher) as Arc<dyn ActionDispatcherTrait>,
        )
        .unwrap();

        let grid_before = board.detector(0).bounds();
        let call_before = board.detector(2).bounds();

        board.handle_resize(ScreenConfig {
            width: 640.0,
            height: 480.0,
        });

        assert_ne!(board.detector(0).bounds(), grid_before);
        assert_eq!(board.detector(2).bounds(), call_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_activation() {
        let config = test_config();
        let broadcaster = Arc::new(CursorBroadcaster::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());

        let board = RequestBoard::new(
            &config,
            Arc::clone(&broadcaster),
            Arc::clone(&dispatcher) as Arc<dyn ActionDispatcherTrait>,
        )
        .unwrap();

        let cell = board.detector(1).bounds();
        broadcaster.update(cell.x, cell.y); // граница включительно
        assert!(board.detector(1).is_armed());

        board.teardown();
        assert_eq!(broadcaster.subscriber_count(), 0);

        advance_ms(5000).await;
        assert!(dispatcher.recorded().is_empty());
    }
}
