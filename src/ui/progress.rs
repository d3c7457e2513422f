//! Progress surfaces for batch retrieval.
//!
//! The batch processor reports through [`ProgressWindow`]: a headline plus one
//! line per item, each of which can be ticked off, marked failed, or given
//! nested detail lines such as an error message.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle of a line in a progress window
pub type ItemId = usize;

/// Icons a progress line can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Search,
    Spinner,
    Tick,
    Warning,
}

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Search => "🔍",
            Icon::Spinner => "○",
            Icon::Tick => "✓",
            Icon::Warning => "•",
        }
    }
}

/// A progress surface provided by the host
pub trait ProgressWindow: Send {
    fn change_headline(&mut self, text: &str, icon: Option<Icon>);

    /// Add a top-level line
    fn add_item(&mut self, icon: Icon, label: &str) -> ItemId;

    /// Add a detail line nested under `parent`
    fn add_sub_item(&mut self, parent: ItemId, icon: Icon, label: &str) -> ItemId;

    fn set_icon(&mut self, item: ItemId, icon: Icon);

    /// Set completion in percent (0-100)
    fn set_progress(&mut self, item: ItemId, percent: u8);

    fn set_error(&mut self, item: ItemId);

    fn show(&mut self);

    /// Dismiss the window once `delay` has elapsed
    fn start_close_timer(&mut self, delay: Duration);

    fn close(&mut self);
}

/// Terminal progress window built on indicatif.
///
/// Nothing is drawn until [`ProgressWindow::show`]. The close timer clears the
/// lines after its delay when a tokio runtime is running; outside one they stay
/// until [`ProgressWindow::close`].
pub struct TerminalProgress {
    multi: MultiProgress,
    headline: ProgressBar,
    bars: Vec<ProgressBar>,
    labels: Vec<String>,
    close_task: Option<JoinHandle<()>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let headline = multi.add(ProgressBar::new_spinner());
        headline.set_style(plain_style());

        Self {
            multi,
            headline,
            bars: Vec::new(),
            labels: Vec::new(),
            close_task: None,
        }
    }

    fn bar(&self, item: ItemId) -> Option<&ProgressBar> {
        self.bars.get(item)
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
}

impl ProgressWindow for TerminalProgress {
    fn change_headline(&mut self, text: &str, icon: Option<Icon>) {
        let message = match icon {
            Some(icon) => format!("{} {}", icon.glyph(), text.bold()),
            None => text.bold().to_string(),
        };
        self.headline.set_message(message);
    }

    fn add_item(&mut self, icon: Icon, label: &str) -> ItemId {
        let bar = self.multi.add(ProgressBar::new_spinner());
        if icon == Icon::Spinner {
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_message(label.to_string());
        } else {
            bar.set_style(plain_style());
            bar.set_message(format!("{} {}", icon.glyph(), label));
        }

        self.bars.push(bar);
        self.labels.push(label.to_string());
        self.bars.len() - 1
    }

    fn add_sub_item(&mut self, parent: ItemId, icon: Icon, label: &str) -> ItemId {
        let bar = match self.bar(parent) {
            Some(parent_bar) => self.multi.insert_after(parent_bar, ProgressBar::new_spinner()),
            None => self.multi.add(ProgressBar::new_spinner()),
        };
        bar.set_style(plain_style());
        bar.finish_with_message(format!("    {} {}", icon.glyph().yellow(), label.dimmed()));

        self.bars.push(bar);
        self.labels.push(label.to_string());
        self.bars.len() - 1
    }

    fn set_icon(&mut self, item: ItemId, icon: Icon) {
        let (Some(bar), Some(label)) = (self.bars.get(item), self.labels.get(item)) else {
            return;
        };
        bar.set_style(plain_style());
        let glyph = match icon {
            Icon::Tick => icon.glyph().green().bold().to_string(),
            _ => icon.glyph().to_string(),
        };
        bar.set_message(format!("{} {}", glyph, label));
    }

    fn set_progress(&mut self, item: ItemId, percent: u8) {
        if percent >= 100 {
            if let Some(bar) = self.bar(item) {
                bar.finish();
            }
        }
    }

    fn set_error(&mut self, item: ItemId) {
        let (Some(bar), Some(label)) = (self.bars.get(item), self.labels.get(item)) else {
            return;
        };
        bar.set_style(plain_style());
        bar.finish_with_message(format!("{} {}", "✗".red().bold(), label.red()));
    }

    fn show(&mut self) {
        self.multi.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn start_close_timer(&mut self, delay: Duration) {
        self.headline.finish();
        for bar in &self.bars {
            if !bar.is_finished() {
                bar.finish();
            }
        }

        if let Some(task) = self.close_task.take() {
            task.abort();
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let multi = self.multi.clone();
            self.close_task = Some(handle.spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = multi.clear();
            }));
        }
    }

    fn close(&mut self) {
        if let Some(task) = self.close_task.take() {
            task.abort();
        }
        let _ = self.multi.clear();
    }
}

/// One line captured by [`RecordingProgress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedItem {
    pub label: String,
    pub icon: Icon,
    pub progress: u8,
    pub error: bool,
    pub parent: Option<ItemId>,
}

/// A progress window that records every call, for tests and headless use
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    /// Every headline set, in order
    pub headlines: Vec<String>,
    pub items: Vec<RecordedItem>,
    pub shown: bool,
    pub closed: bool,
    pub close_timer: Option<Duration>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current headline
    pub fn headline(&self) -> Option<&str> {
        self.headlines.last().map(String::as_str)
    }

    /// Top-level lines, in the order they were added
    pub fn top_level(&self) -> Vec<&RecordedItem> {
        self.items.iter().filter(|i| i.parent.is_none()).collect()
    }

    /// Detail lines nested under `parent`
    pub fn children(&self, parent: ItemId) -> Vec<&RecordedItem> {
        self.items
            .iter()
            .filter(|i| i.parent == Some(parent))
            .collect()
    }

    /// Whether nothing at all was reported
    pub fn is_untouched(&self) -> bool {
        self.headlines.is_empty() && self.items.is_empty() && !self.shown
    }

    fn push(&mut self, icon: Icon, label: &str, parent: Option<ItemId>) -> ItemId {
        self.items.push(RecordedItem {
            label: label.to_string(),
            icon,
            progress: 0,
            error: false,
            parent,
        });
        self.items.len() - 1
    }
}

impl ProgressWindow for RecordingProgress {
    fn change_headline(&mut self, text: &str, _icon: Option<Icon>) {
        self.headlines.push(text.to_string());
    }

    fn add_item(&mut self, icon: Icon, label: &str) -> ItemId {
        self.push(icon, label, None)
    }

    fn add_sub_item(&mut self, parent: ItemId, icon: Icon, label: &str) -> ItemId {
        self.push(icon, label, Some(parent))
    }

    fn set_icon(&mut self, item: ItemId, icon: Icon) {
        if let Some(i) = self.items.get_mut(item) {
            i.icon = icon;
        }
    }

    fn set_progress(&mut self, item: ItemId, percent: u8) {
        if let Some(i) = self.items.get_mut(item) {
            i.progress = percent.min(100);
        }
    }

    fn set_error(&mut self, item: ItemId) {
        if let Some(i) = self.items.get_mut(item) {
            i.error = true;
        }
    }

    fn show(&mut self) {
        self.shown = true;
    }

    fn start_close_timer(&mut self, delay: Duration) {
        self.close_timer = Some(delay);
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_progress() {
        let mut progress = RecordingProgress::new();
        assert!(progress.is_untouched());

        progress.change_headline("Working", Some(Icon::Search));
        let a = progress.add_item(Icon::Spinner, "Paper A");
        let b = progress.add_item(Icon::Spinner, "Paper B");
        progress.show();

        progress.set_icon(a, Icon::Tick);
        progress.set_progress(a, 100);
        progress.set_error(b);
        let detail = progress.add_sub_item(b, Icon::Warning, "No DOI");

        assert_eq!(progress.headline(), Some("Working"));
        assert_eq!(progress.top_level().len(), 2);
        assert_eq!(progress.items[a].icon, Icon::Tick);
        assert_eq!(progress.items[a].progress, 100);
        assert!(progress.items[b].error);
        assert_eq!(progress.children(b)[0].label, "No DOI");
        assert_eq!(progress.items[detail].parent, Some(b));
        assert!(!progress.is_untouched());
    }

    #[test]
    fn test_terminal_progress_hidden_until_shown() {
        let mut progress = TerminalProgress::new();
        progress.change_headline("Working", None);
        let a = progress.add_item(Icon::Spinner, "Paper A");
        progress.set_icon(a, Icon::Tick);
        progress.set_progress(a, 100);
        let b = progress.add_item(Icon::Spinner, "Paper B");
        progress.set_error(b);
        progress.add_sub_item(b, Icon::Warning, "No DOI");
        progress.start_close_timer(Duration::from_secs(5));

        // No runtime to schedule the dismissal on
        assert!(progress.close_task.is_none());
        progress.close();
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_timer_dismisses_after_delay() {
        let mut progress = TerminalProgress::new();
        progress.change_headline("Working", None);
        progress.add_item(Icon::Spinner, "Paper A");
        progress.start_close_timer(Duration::from_secs(5));

        let task = progress.close_task.take().unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!task.is_finished());

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_close_cancels_pending_timer() {
        let mut progress = TerminalProgress::new();
        progress.start_close_timer(Duration::from_secs(60));
        assert!(progress.close_task.is_some());

        progress.close();
        assert!(progress.close_task.is_none());
    }

    #[test]
    fn test_unknown_item_ids_are_ignored() {
        let mut progress = TerminalProgress::new();
        progress.set_icon(7, Icon::Tick);
        progress.set_error(7);
        progress.set_progress(7, 100);

        let mut recording = RecordingProgress::new();
        recording.set_error(3);
        assert!(recording.items.is_empty());
    }
}
