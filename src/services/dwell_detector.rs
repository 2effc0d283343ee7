use crate::debug_if_enabled;
use crate::events::{ActivationEvent, CursorPosition, RequestKind, TargetBounds, TargetId};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::info;

/// Настройки dwell-детектора, неизменяемые после создания
#[derive(Debug, Clone)]
pub struct DwellConfig {
    /// Сколько непрерывных миллисекунд курсор должен провести внутри цели
    pub dwell_duration_ms: u64,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            dwell_duration_ms: 4000,
        }
    }
}

pub type ActivationCallback = Arc<dyn Fn(ActivationEvent) + Send + Sync>;

/// Взведённый одноразовый таймер ожидания активации
#[derive(Debug)]
struct ArmedTimer {
    handle: JoinHandle<()>,
    generation: u64,
}

/// DwellDetector: state machine одной цели на экране.
///
/// Состояния: IDLE (курсор не отслеживается) и ARMED (курсор внутри цели,
/// таймер идёт к активации). Инвариант: детектор в ARMED тогда и только
/// тогда, когда удерживается ровно один хэндл таймера.
///
/// Политика "без паузы": любой выход курсора за границы полностью
/// обнуляет накопленное время, повторный вход отсчитывает порог заново.
/// Попадание проверяется по прямоугольнику, а не по неподвижности —
/// микродрожание взгляда внутри цели таймер не сбрасывает.
pub struct DwellDetector {
    inner: Arc<DetectorInner>,
}

struct DetectorInner {
    target: TargetId,
    label: String,
    kind: RequestKind,
    config: DwellConfig,
    bounds: RwLock<TargetBounds>,
    armed: Mutex<Option<ArmedTimer>>,
    // Поколение взвода: устаревший таймер, проснувшийся после отмены,
    // обнаруживает несовпадение и не стреляет
    generation: AtomicU64,
    action: ActivationCallback,
    torn_down: AtomicBool,
}

impl DwellDetector {
    pub fn new(
        target: TargetId,
        label: String,
        kind: RequestKind,
        bounds: TargetBounds,
        config: DwellConfig,
        action: ActivationCallback,
    ) -> Self {
        debug_if_enabled!(
            "Создан dwell-детектор {} \"{}\" ({}мс, {})",
            target,
            label,
            config.dwell_duration_ms,
            bounds
        );

        Self {
            inner: Arc::new(DetectorInner {
                target,
                label,
                kind,
                config,
                bounds: RwLock::new(bounds),
                armed: Mutex::new(None),
                generation: AtomicU64::new(0),
                action,
                torn_down: AtomicBool::new(false),
            }),
        }
    }

    /// Обработать новую позицию курсора.
    ///
    /// Внутри при IDLE — взводим таймер; внутри при ARMED — ничего
    /// (таймер не пересоздаётся); снаружи при ARMED — немедленная отмена.
    pub fn handle_cursor_move(&self, pos: CursorPosition) {
        if self.inner.torn_down.load(Ordering::SeqCst) {
            return;
        }

        let inside = self.inner.bounds.read().contains(pos);
        let mut armed = self.inner.armed.lock();

        if inside {
            if armed.is_none() {
                let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
                debug_if_enabled!(
                    "{} \"{}\": курсор внутри, взводим таймер на {}мс (поколение {})",
                    self.inner.target,
                    self.inner.label,
                    self.inner.config.dwell_duration_ms,
                    generation
                );
                let handle = Self::spawn_dwell_timer(Arc::clone(&self.inner), generation);
                *armed = Some(ArmedTimer { handle, generation });
            }
        } else if let Some(timer) = armed.take() {
            timer.handle.abort();
            debug_if_enabled!(
                "{} \"{}\": курсор вышел, dwell сброшен (прогресс обнулён)",
                self.inner.target,
                self.inner.label
            );
        }
    }

    /// Одноразовый таймер активации. Проснувшись, таймер стреляет только
    /// если его поколение всё ещё взведено: отмена, успевшая раньше по
    /// порядку событий, всегда выигрывает.
    fn spawn_dwell_timer(inner: Arc<DetectorInner>, generation: u64) -> JoinHandle<()> {
        // Дедлайн фиксируется в момент взвода, а не при первом опросе
        // задачи: задержка планировщика между spawn и poll не должна
        // удлинять dwell
        let deadline = Instant::now() + Duration::from_millis(inner.config.dwell_duration_ms);

        tokio::spawn(async move {
            sleep_until(deadline).await;

            {
                let mut armed = inner.armed.lock();
                if inner.torn_down.load(Ordering::SeqCst) {
                    return;
                }
                match armed.as_ref() {
                    Some(timer) if timer.generation == generation => {
                        // Возврат в IDLE до вызова действия: следующий
                        // непрерывный dwell может начаться сразу
                        *armed = None;
                    }
                    _ => return, // таймер был отменён
                }
            }

            let event = ActivationEvent::new(
                inner.target,
                inner.label.clone(),
                inner.kind,
                inner.config.dwell_duration_ms,
            );
            info!("Активация цели: {}", event);
            (inner.action)(event);
        })
    }

    /// Обновить прямоугольник цели после изменения раскладки.
    /// Переоценка попадания произойдёт на следующем обновлении позиции.
    pub fn set_bounds(&self, bounds: TargetBounds) {
        debug_if_enabled!(
            "{} \"{}\": новая геометрия {}",
            self.inner.target,
            self.inner.label,
            bounds
        );
        *self.inner.bounds.write() = bounds;
    }

    pub fn bounds(&self) -> TargetBounds {
        *self.inner.bounds.read()
    }

    pub fn target(&self) -> TargetId {
        self.inner.target
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn is_armed(&self) -> bool {
        self.inner.armed.lock().is_some()
    }

    /// Синхронная отмена при уходе цели с экрана: строго
    /// "отмена, затем разрушение", чтобы устаревший таймер не выстрелил
    /// по уже не существующей цели.
    pub fn teardown(&self) {
        // Флаг выставляется под тем же замком, которым защищён слот
        // таймера: проснувшаяся задача проверяет его в той же критической
        // секции и после teardown выстрелить уже не может
        let mut armed = self.inner.armed.lock();
        self.inner.torn_down.store(true, Ordering::SeqCst);

        if let Some(timer) = armed.take() {
            timer.handle.abort();
            info!(
                "{} \"{}\": teardown при взведённом таймере, активация отменена",
                self.inner.target, self.inner.label
            );
        }
    }
}

impl Drop for DwellDetector {
    fn drop(&mut self) {
        // Детектор уходит без явного teardown — гасим таймер здесь.
        // Внутреннее состояние нельзя освобождать в Drop задачи таймера:
        // спящая задача сама держит ссылку на него
        let mut armed = self.inner.armed.lock();
        self.inner.torn_down.store(true, Ordering::SeqCst);
        if let Some(timer) = armed.take() {
            timer.handle.abort();
        }
    }
}
