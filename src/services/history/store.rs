use super::entry::HistoryEntry;
use std::collections::VecDeque;
use tracing::error;

/// С какой стороны списка находится самая новая запись
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    NewestFirst,
    NewestLast,
}

impl Direction {
    pub fn from_newest_first(newest_first: bool) -> Self {
        if newest_first {
            Direction::NewestFirst
        } else {
            Direction::NewestLast
        }
    }
}

/// Ограниченная по ёмкости история в порядке отображения.
///
/// Вставка и вытеснение идут через один маршрут, параметризованный
/// направлением: "новый конец" и "старый конец".
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    direction: Direction,
}

impl History {
    pub fn new(capacity: usize, direction: Direction) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            direction,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Записи в порядке отображения (индекс 0 - верхняя строка)
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text().to_string()).collect()
    }

    pub fn newest(&self) -> Option<&HistoryEntry> {
        match self.direction {
            Direction::NewestFirst => self.entries.front(),
            Direction::NewestLast => self.entries.back(),
        }
    }

    pub fn newest_mut(&mut self) -> Option<&mut HistoryEntry> {
        match self.direction {
            Direction::NewestFirst => self.entries.front_mut(),
            Direction::NewestLast => self.entries.back_mut(),
        }
    }

    /// Вставить запись в новый конец; при переполнении вытесняется ровно одна старая
    pub fn push_newest(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        match self.direction {
            Direction::NewestFirst => self.entries.push_front(entry),
            Direction::NewestLast => self.entries.push_back(entry),
        }

        let evicted = if self.entries.len() > self.capacity {
            self.pop_oldest()
        } else {
            None
        };

        self.enforce_capacity();
        evicted
    }

    pub fn pop_oldest(&mut self) -> Option<HistoryEntry> {
        match self.direction {
            Direction::NewestFirst => self.entries.pop_back(),
            Direction::NewestLast => self.entries.pop_front(),
        }
    }

    /// Сменить ёмкость; лишние записи сразу удаляются со старого конца
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity.max(1);
        let mut removed = 0;
        while self.entries.len() > self.capacity {
            self.pop_oldest();
            removed += 1;
        }
        removed
    }

    /// Сменить направление, сохранив хронологию: новый конец остаётся новым
    pub fn set_direction(&mut self, direction: Direction) {
        if self.direction != direction {
            self.entries.make_contiguous().reverse();
            self.direction = direction;
        }
    }

    /// Удалить записи, не прошедшие проверку; порядок оставшихся сохраняется
    pub fn retain(&mut self, keep: impl FnMut(&HistoryEntry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(keep);
        before - self.entries.len()
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut HistoryEntry> {
        self.entries.iter_mut()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Превышение ёмкости - ошибка программы: в debug падаем, в release обрезаем
    fn enforce_capacity(&mut self) {
        debug_assert!(
            self.entries.len() <= self.capacity,
            "история превысила ёмкость: {} > {}",
            self.entries.len(),
            self.capacity
        );

        if self.entries.len() > self.capacity {
            error!(
                "История превысила ёмкость ({} > {}), обрезаем",
                self.entries.len(),
                self.capacity
            );
            while self.entries.len() > self.capacity {
                self.pop_oldest();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn history_with(direction: Direction, capacity: usize, tokens: &[&str]) -> History {
        let now = Instant::now();
        let mut history = History::new(capacity, direction);
        for token in tokens {
            history.push_newest(HistoryEntry::new(*token, now));
        }
        history
    }

    #[test]
    fn test_newest_last_order_and_eviction() {
        let mut history = history_with(Direction::NewestLast, 2, &["A", "B"]);
        assert_eq!(history.texts(), vec!["A", "B"]);
        assert_eq!(history.newest().map(|e| e.text()), Some("B"));

        let evicted = history.push_newest(HistoryEntry::new("C", Instant::now()));
        assert_eq!(evicted.map(|e| e.text().to_string()).as_deref(), Some("A"));
        assert_eq!(history.texts(), vec!["B", "C"]);
    }

    #[test]
    fn test_newest_first_order_and_eviction() {
        let mut history = history_with(Direction::NewestFirst, 2, &["A", "B"]);
        assert_eq!(history.texts(), vec!["B", "A"]);

        history.push_newest(HistoryEntry::new("C", Instant::now()));
        assert_eq!(history.texts(), vec!["C", "B"]);
    }

    #[test]
    fn test_shrinking_capacity_truncates_oldest() {
        let mut history = history_with(Direction::NewestLast, 5, &["A", "B", "C", "D"]);
        let removed = history.set_capacity(2);

        assert_eq!(removed, 2);
        assert_eq!(history.texts(), vec!["C", "D"]);
    }

    #[test]
    fn test_direction_change_keeps_newest_end() {
        let mut history = history_with(Direction::NewestLast, 5, &["A", "B", "C"]);
        history.set_direction(Direction::NewestFirst);

        assert_eq!(history.texts(), vec!["C", "B", "A"]);
        assert_eq!(history.newest().map(|e| e.text()), Some("C"));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let history = History::new(0, Direction::NewestLast);
        assert_eq!(history.capacity(), 1);
    }
}
