//! `activity24 window`

use activity24_stats::{compute_window, lookback_string, needs_warning, LanguagePack};

pub fn run(seconds: i64, now: i64, lang: &LanguagePack) {
    let window = compute_window(seconds, now);
    println!("now:       {}", window.now);
    println!("threshold: {}", window.threshold);
    println!("duration:  {}", lookback_string(seconds, lang));
    if needs_warning(seconds) {
        println!("warning:   lookback is under 60 seconds");
    }
}
