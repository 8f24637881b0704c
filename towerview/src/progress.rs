use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Returns a percent-complete bar drawn to stderr.
pub fn bar(header: String) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stderr_with_hz(4));
    pb.set_prefix(header);
    pb.set_style(
        ProgressStyle::with_template("{prefix}...\n[{wide_bar:.cyan/blue}] {pos}% {elapsed}")
            .expect("incorrect progress bar format string")
            .progress_chars("#>-"),
    );
    pb
}
