use crate::import::ImportProgress;
use crate::ui::theme;
use crate::ui::Icons;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// One progress bar per table being filled.
///
/// Bars are hidden when stdout is not a terminal or when output is suppressed.
pub struct TableProgress {
    visible: bool,
    bar: Option<ProgressBar>,
}

impl TableProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            visible: !quiet && console::Term::stdout().is_term(),
            bar: None,
        }
    }
}

impl ImportProgress for TableProgress {
    fn started(&mut self, table: &str, total: usize) {
        let bar = if self.visible {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{msg:>12} [{bar:30}] {pos}/{len}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(table.to_string());
        self.bar = Some(bar);
    }

    fn row(&mut self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn finished(&mut self, table: &str, inserted: usize) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        if self.visible {
            println!(
                "{} {} {}",
                Icons::CHECK.style(theme().success.clone()),
                table.style(theme().header.clone()),
                format!("{} rows", inserted).style(theme().dim.clone())
            );
        }
    }
}
