use super::entry::HistoryEntry;
use super::store::{Direction, History};
use super::sweeper;
use crate::config::HistoryConfig;
use crate::debug_if_enabled;
use std::time::{Duration, Instant};

/// Окно повтора одинаковых токенов (фиксированное)
pub const REPEAT_WINDOW: Duration = Duration::from_secs(1);

/// Настройки агрегации, полученные из `HistoryConfig`
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySettings {
    pub max_entries: usize,
    /// None - записи не стареют
    pub fade_duration: Option<Duration>,
    pub grouping_enabled: bool,
    pub group_duration: Duration,
    pub direction: Direction,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self::from(&HistoryConfig::default())
    }
}

impl From<&HistoryConfig> for HistorySettings {
    fn from(config: &HistoryConfig) -> Self {
        let fade_duration = if config.fade_duration_secs > 0.0 {
            Some(Duration::from_secs_f64(config.fade_duration_secs))
        } else {
            None
        };

        Self {
            max_entries: config.max_entries.max(1),
            fade_duration,
            grouping_enabled: config.grouping_enabled,
            group_duration: Duration::from_secs_f64(config.group_duration_secs.max(0.0)),
            direction: Direction::from_newest_first(config.newest_first),
        }
    }
}

/// Что произошло с историей после очередного токена
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Repeated { count: u32 },
    GroupExtended,
    GroupStarted,
    GroupClosed,
    Inserted { evicted: Option<String> },
}

/// Состояние истории одной сессии: записи, накопитель группы и время последнего токена
#[derive(Debug, Clone)]
pub struct HistoryAggregator {
    history: History,
    group: String,
    last_token_at: Option<Instant>,
    settings: HistorySettings,
}

impl HistoryAggregator {
    pub fn new(settings: HistorySettings) -> Self {
        Self {
            history: History::new(settings.max_entries, settings.direction),
            group: String::new(),
            last_token_at: None,
            settings,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }

    /// Текущий незакрытый прогон группы (пустая строка - группы нет)
    pub fn group_accumulator(&self) -> &str {
        &self.group
    }

    /// Применить новые настройки: уменьшение max_entries сразу обрезает историю
    pub fn apply_settings(&mut self, settings: HistorySettings) -> usize {
        self.history.set_direction(settings.direction);
        let removed = self.history.set_capacity(settings.max_entries);
        if !settings.grouping_enabled {
            self.group.clear();
        }
        self.settings = settings;
        removed
    }

    /// Добавить восстановленную запись как самую новую
    pub fn seed(&mut self, entry: HistoryEntry) {
        self.last_token_at = Some(entry.touched_at());
        self.group.clear();
        self.history.push_newest(entry);
    }

    /// Принять токен: повтор, группировка или новая запись - первая подходящая ветка
    pub fn add_token(&mut self, token: &str, now: Instant) -> AddOutcome {
        let elapsed = self
            .last_token_at
            .map(|last| now.saturating_duration_since(last));

        let outcome = match elapsed {
            Some(elapsed) if !self.history.is_empty() => self
                .try_repeat(token, elapsed, now)
                .or_else(|| self.try_group(token, elapsed, now))
                .unwrap_or_else(|| self.insert(token, now)),
            _ => self.insert(token, now),
        };

        self.last_token_at = Some(now);
        debug_if_enabled!("Токен '{}' -> {:?} (записей: {})", token, outcome, self.history.len());
        outcome
    }

    /// Удалить устаревшие записи; вызывается на каждом тике
    pub fn sweep(&mut self, now: Instant) -> usize {
        let removed = sweeper::sweep(&mut self.history, now, self.settings.fade_duration);
        if self.history.is_empty() {
            self.group.clear();
        }
        removed
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.history.texts()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.group.clear();
        self.last_token_at = None;
    }

    fn try_repeat(&mut self, token: &str, elapsed: Duration, now: Instant) -> Option<AddOutcome> {
        if elapsed >= REPEAT_WINDOW {
            return None;
        }

        let recent = self.history.newest_mut()?;
        if recent.base() != token {
            return None;
        }

        recent.increment_repeat(now);
        Some(AddOutcome::Repeated {
            count: recent.repeat_count(),
        })
    }

    fn try_group(&mut self, token: &str, elapsed: Duration, now: Instant) -> Option<AddOutcome> {
        // Окно группировки вложено в окно повтора
        let window = self.settings.group_duration.min(REPEAT_WINDOW);
        if !self.settings.grouping_enabled || elapsed >= window {
            return None;
        }

        let groupable = is_groupable(token);
        let recent = self.history.newest_mut()?;
        let compatible = recent.is_group_compatible();

        if groupable && compatible {
            if self.group.is_empty() {
                self.group = format!("{}{}", recent.base(), token);
                recent.set_group_text(self.group.clone(), true, now);
                return Some(AddOutcome::GroupStarted);
            }

            self.group.push_str(token);
            recent.set_group_text(self.group.clone(), true, now);
            return Some(AddOutcome::GroupExtended);
        }

        if !groupable && !self.group.is_empty() {
            let closed = format!("{} + {}", self.group, token);
            recent.set_group_text(closed, false, now);
            self.group.clear();
            return Some(AddOutcome::GroupClosed);
        }

        None
    }

    fn insert(&mut self, token: &str, now: Instant) -> AddOutcome {
        self.group.clear();
        let evicted = self
            .history
            .push_newest(HistoryEntry::new(token, now))
            .map(|entry| entry.text().to_string());
        AddOutcome::Inserted { evicted }
    }
}

/// Простой символ без модификаторов: одна буква или цифра
pub fn is_groupable(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn settings(max_entries: usize) -> HistorySettings {
        HistorySettings {
            max_entries,
            ..HistorySettings::default()
        }
    }

    fn grouping_settings() -> HistorySettings {
        HistorySettings {
            grouping_enabled: true,
            group_duration: ms(500),
            ..HistorySettings::default()
        }
    }

    #[test]
    fn test_capacity_invariant_holds_for_every_call() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(3));
        let tokens = ["A", "B", "A", "Ctrl + C", "Left Click", "1", "2", "Scroll Up", "Z"];

        for (i, token) in tokens.iter().enumerate() {
            aggregator.add_token(token, start + ms(1300 * i as u64));
            assert!(aggregator.history().len() <= 3);
        }
        assert_eq!(aggregator.snapshot(), vec!["2", "Scroll Up", "Z"]);
    }

    #[test]
    fn test_repetition_within_window() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(5));

        aggregator.add_token("A", start);
        aggregator.add_token("A", start + ms(300));
        let outcome = aggregator.add_token("A", start + ms(600));

        assert_eq!(outcome, AddOutcome::Repeated { count: 3 });
        assert_eq!(aggregator.snapshot(), vec!["A x3"]);
    }

    #[test]
    fn test_repeat_window_boundary() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(2));

        aggregator.add_token("A", start);
        aggregator.add_token("A", start + ms(1200));

        assert_eq!(aggregator.snapshot(), vec!["A", "A"]);
    }

    #[test]
    fn test_repeat_window_is_exclusive() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(2));

        aggregator.add_token("A", start);
        aggregator.add_token("A", start + REPEAT_WINDOW);

        assert_eq!(aggregator.snapshot(), vec!["A", "A"]);
    }

    #[test]
    fn test_repetition_touches_timestamp_without_eviction() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(1));

        aggregator.add_token("Ctrl + Z", start);
        aggregator.add_token("Ctrl + Z", start + ms(900));

        let entry = aggregator.history().newest().unwrap();
        assert_eq!(entry.text(), "Ctrl + Z x2");
        assert_eq!(entry.touched_at(), start + ms(900));
    }

    #[test]
    fn test_grouping_builds_word_and_closes_with_shortcut() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(grouping_settings());

        assert!(matches!(aggregator.add_token("A", start), AddOutcome::Inserted { .. }));
        assert_eq!(aggregator.add_token("B", start + ms(200)), AddOutcome::GroupStarted);
        assert_eq!(aggregator.add_token("C", start + ms(400)), AddOutcome::GroupExtended);
        assert_eq!(aggregator.snapshot(), vec!["ABC"]);
        assert_eq!(aggregator.group_accumulator(), "ABC");
        assert!(aggregator.history().newest().unwrap().is_group_run());

        assert_eq!(aggregator.add_token("Ctrl + X", start + ms(600)), AddOutcome::GroupClosed);
        assert_eq!(aggregator.snapshot(), vec!["ABC + Ctrl + X"]);
        assert_eq!(aggregator.group_accumulator(), "");
        assert!(!aggregator.history().newest().unwrap().is_group_run());
    }

    #[test]
    fn test_repetition_beats_grouping() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(grouping_settings());

        aggregator.add_token("A", start);
        aggregator.add_token("A", start + ms(100));

        assert_eq!(aggregator.snapshot(), vec!["A x2"]);
    }

    #[test]
    fn test_repeated_entry_does_not_start_group() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(grouping_settings());

        aggregator.add_token("A", start);
        aggregator.add_token("A", start + ms(100));
        aggregator.add_token("B", start + ms(200));

        assert_eq!(aggregator.snapshot(), vec!["A x2", "B"]);
    }

    #[test]
    fn test_group_window_expiry_starts_new_entry() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(grouping_settings());

        aggregator.add_token("A", start);
        aggregator.add_token("B", start + ms(200));
        aggregator.add_token("C", start + ms(800));

        assert_eq!(aggregator.snapshot(), vec!["AB", "C"]);
        assert_eq!(aggregator.group_accumulator(), "");
    }

    #[test]
    fn test_group_window_never_exceeds_repeat_window() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(HistorySettings {
            grouping_enabled: true,
            group_duration: ms(2000),
            ..HistorySettings::default()
        });

        aggregator.add_token("A", start);
        aggregator.add_token("B", start + ms(900));
        aggregator.add_token("C", start + ms(2400));

        assert_eq!(aggregator.snapshot(), vec!["AB", "C"]);
    }

    #[test]
    fn test_non_groupable_without_open_group_is_new_entry() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(grouping_settings());

        aggregator.add_token("Left Click", start);
        aggregator.add_token("A", start + ms(100));
        aggregator.add_token("Enter", start + ms(200));

        assert_eq!(aggregator.snapshot(), vec!["Left Click", "A", "Enter"]);
    }

    #[test]
    fn test_grouping_disabled_keeps_separate_entries() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(5));

        aggregator.add_token("A", start);
        aggregator.add_token("B", start + ms(100));

        assert_eq!(aggregator.snapshot(), vec!["A", "B"]);
    }

    #[test]
    fn test_ordering_by_direction() {
        let start = Instant::now();

        let mut newest_first = HistoryAggregator::new(HistorySettings {
            direction: Direction::NewestFirst,
            ..HistorySettings::default()
        });
        newest_first.add_token("A", start);
        newest_first.add_token("B", start + ms(100));
        assert_eq!(newest_first.snapshot(), vec!["B", "A"]);

        let mut newest_last = HistoryAggregator::new(HistorySettings::default());
        newest_last.add_token("A", start);
        newest_last.add_token("B", start + ms(100));
        assert_eq!(newest_last.snapshot(), vec!["A", "B"]);
    }

    #[test]
    fn test_newest_first_repetition_targets_front() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(HistorySettings {
            direction: Direction::NewestFirst,
            ..HistorySettings::default()
        });

        aggregator.add_token("A", start);
        aggregator.add_token("B", start + ms(1500));
        aggregator.add_token("B", start + ms(1700));

        assert_eq!(aggregator.snapshot(), vec!["B x2", "A"]);
    }

    #[test]
    fn test_apply_settings_truncates_history() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(5));
        for (i, token) in ["A", "B", "C", "D"].iter().enumerate() {
            aggregator.add_token(token, start + ms(2000 * i as u64));
        }

        let removed = aggregator.apply_settings(settings(2));

        assert_eq!(removed, 2);
        assert_eq!(aggregator.snapshot(), vec!["C", "D"]);
    }

    #[test]
    fn test_seeded_entry_continues_repeat_count() {
        let start = Instant::now();
        let mut aggregator = HistoryAggregator::new(settings(5));
        aggregator.seed(HistoryEntry::from_text("Left Click x2", start));

        aggregator.add_token("Left Click", start + ms(200));

        assert_eq!(aggregator.snapshot(), vec!["Left Click x3"]);
    }

    #[test]
    fn test_groupable_tokens() {
        assert!(is_groupable("A"));
        assert!(is_groupable("7"));
        assert!(!is_groupable("!"));
        assert!(!is_groupable("Tab"));
        assert!(!is_groupable("Ctrl + A"));
        assert!(!is_groupable("←"));
    }
}
