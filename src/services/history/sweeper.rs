use super::store::History;
use crate::debug_if_enabled;
use std::time::{Duration, Instant};

/// Пометить и удалить записи, не обновлявшиеся дольше `fade_duration`.
/// Истечение бинарное: частичной прозрачности нет.
pub fn sweep(history: &mut History, now: Instant, fade_duration: Option<Duration>) -> usize {
    let Some(fade) = fade_duration else {
        return 0;
    };

    for entry in history.entries_mut() {
        if !entry.is_expired() && now.saturating_duration_since(entry.touched_at()) > fade {
            entry.mark_expired();
        }
    }

    let removed = history.retain(|entry| !entry.is_expired());
    if removed > 0 {
        debug_if_enabled!("Удалено {} устаревших записей, осталось {}", removed, history.len());
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::history::entry::HistoryEntry;
    use crate::services::history::store::Direction;

    const FADE: Duration = Duration::from_secs(3);

    #[test]
    fn test_entry_older_than_fade_is_removed() {
        let start = Instant::now();
        let mut history = History::new(5, Direction::NewestLast);
        history.push_newest(HistoryEntry::new("A", start));

        assert_eq!(sweep(&mut history, start + Duration::from_millis(3100), Some(FADE)), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_entry_younger_than_fade_survives() {
        let start = Instant::now();
        let mut history = History::new(5, Direction::NewestLast);
        history.push_newest(HistoryEntry::new("A", start));

        assert_eq!(sweep(&mut history, start + Duration::from_millis(2900), Some(FADE)), 0);
        assert_eq!(history.texts(), vec!["A"]);
    }

    #[test]
    fn test_survivors_keep_order() {
        let start = Instant::now();
        let mut history = History::new(5, Direction::NewestFirst);
        history.push_newest(HistoryEntry::new("A", start));
        history.push_newest(HistoryEntry::new("B", start + Duration::from_secs(2)));
        history.push_newest(HistoryEntry::new("C", start + Duration::from_secs(3)));

        sweep(&mut history, start + Duration::from_millis(5500), Some(FADE));

        assert_eq!(history.texts(), vec!["C"]);

        history.push_newest(HistoryEntry::new("D", start + Duration::from_secs(4)));
        sweep(&mut history, start + Duration::from_millis(5600), Some(FADE));
        assert_eq!(history.texts(), vec!["D", "C"]);
    }

    #[test]
    fn test_disabled_fade_never_expires() {
        let start = Instant::now();
        let mut history = History::new(5, Direction::NewestLast);
        history.push_newest(HistoryEntry::new("A", start));

        assert_eq!(sweep(&mut history, start + Duration::from_secs(3600), None), 0);
        assert_eq!(history.len(), 1);
    }
}
