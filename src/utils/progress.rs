use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress bar for a batch run. Hidden when disabled, so callers never
/// have to check.
#[derive(Clone)]
pub struct BatchProgress {
    progress_bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: u64, visible: bool) -> Self {
        let progress_bar = ProgressBar::new(total);
        if visible {
            progress_bar.set_style(style("cyan/blue"));
            progress_bar.enable_steady_tick(Duration::from_millis(100));
        } else {
            progress_bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { progress_bar }
    }

    pub fn start_document(&self, name: &str) {
        self.progress_bar.set_message(format!("Cleaning [{}]", name));
    }

    pub fn document_done(&self) {
        self.progress_bar.inc(1);
    }

    pub fn finish(&self, message: &str) {
        self.progress_bar.set_style(style("green/blue"));
        self.progress_bar.finish_with_message(message.to_string());
    }
}

fn style(colors: &str) -> ProgressStyle {
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.{}}}] {{pos}}/{{len}} {{msg}}",
        colors
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}
