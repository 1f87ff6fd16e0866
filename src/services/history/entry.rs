use std::time::Instant;

/// Одна видимая строка истории.
///
/// Счётчик повторов и признак группы хранятся явно, а `text` всегда
/// пересобирается из них, поэтому видимый вывод не разбирается обратно.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    base: String,
    repeat_count: u32,
    group_run: bool,
    text: String,
    touched_at: Instant,
    expired: bool,
}

impl HistoryEntry {
    pub fn new(token: impl Into<String>, now: Instant) -> Self {
        let base = token.into();
        Self {
            text: base.clone(),
            base,
            repeat_count: 1,
            group_run: false,
            touched_at: now,
            expired: false,
        }
    }

    /// Восстановить запись из отрисованного текста вида "A x3".
    /// Нечисловой суффикс не считается счётчиком: весь текст становится базой с count = 1.
    pub fn from_text(text: &str, now: Instant) -> Self {
        let (base, count) = split_repeat_suffix(text);
        let mut entry = Self::new(base, now);
        entry.repeat_count = count;
        entry.refresh_text();
        entry
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Текст без суффикса " xN"
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn is_group_run(&self) -> bool {
        self.group_run
    }

    pub fn touched_at(&self) -> Instant {
        self.touched_at
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Можно ли дописывать к записи простые символы
    pub fn is_group_compatible(&self) -> bool {
        self.repeat_count == 1
            && !self.base.contains(" + ")
            && !self.base.contains("Click")
            && !self.base.contains("Scroll")
    }

    pub(crate) fn increment_repeat(&mut self, now: Instant) {
        self.repeat_count = self.repeat_count.saturating_add(1);
        self.refresh_text();
        self.touch(now);
    }

    pub(crate) fn set_group_text(&mut self, text: String, open_run: bool, now: Instant) {
        self.base = text;
        self.repeat_count = 1;
        self.group_run = open_run;
        self.refresh_text();
        self.touch(now);
    }

    pub(crate) fn mark_expired(&mut self) {
        // Истечение необратимо
        self.expired = true;
    }

    fn touch(&mut self, now: Instant) {
        self.touched_at = now;
    }

    fn refresh_text(&mut self) {
        self.text = if self.repeat_count > 1 {
            format!("{} x{}", self.base, self.repeat_count)
        } else {
            self.base.clone()
        };
    }
}

/// "A x3" -> ("A", 3); "A" -> ("A", 1); "A xyz" -> ("A xyz", 1)
pub fn split_repeat_suffix(text: &str) -> (&str, u32) {
    match text.rfind(" x") {
        Some(pos) => match text[pos + 2..].parse::<u32>() {
            Ok(count) if count >= 1 => (&text[..pos], count),
            _ => (text, 1),
        },
        None => (text, 1),
    }
}
