use crate::*;
use progline::progress::ProgressOptions;
use std::time::Duration;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(trials!(
        test_ticker_redraws_elapsed_clock_every_second,
        test_ticker_stops_after_end,
        test_ticker_runs_on_a_thread_without_runtime,
    ));
}

fn elapsed_options() -> ProgressOptions {
    ProgressOptions::default()
        .delay(false)
        .total(2)
        .show_elapsed(true)
}

fn test_ticker_redraws_elapsed_clock_every_second() {
    paused_runtime().block_on(async {
        let (progress, console) = terminal_reporter("Clock", elapsed_options());
        progress.update(0, Some("waiting")).unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;

        // One caller draw plus ticks at 0s, 1s and 2s.
        assert_eq!(console.render_count(), 4);
        assert_eq!(
            last_line(&console),
            format!("\rClock:  0% (0/2) 0:02 | waiting{ERASE_AFTER}")
        );
        progress.end().unwrap();
    });
}

fn test_ticker_stops_after_end() {
    paused_runtime().block_on(async {
        let (progress, console) = terminal_reporter("Clock", elapsed_options());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let before_end = console.render_count();
        assert_eq!(before_end, 2);

        progress.end().unwrap();
        let after_end = console.contents();
        assert!(after_end.ends_with(&format!("done in 1.500s{ERASE_AFTER}\n")));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(console.contents(), after_end);
    });
}

fn test_ticker_runs_on_a_thread_without_runtime() {
    let (progress, console) = terminal_reporter("Clock", elapsed_options());
    progress.update(1, Some("manual")).unwrap();

    std::thread::sleep(Duration::from_millis(2200));
    // The caller draw plus ticks at roughly 0s, 1s and 2s.
    assert!(
        console.render_count() >= 3,
        "only {} draws without a runtime",
        console.render_count()
    );
    assert!(last_line(&console).starts_with("\rClock: 50% (1/2) 0:0"));
    assert!(last_line(&console).ends_with(&format!(" | manual{ERASE_AFTER}")));

    progress.end().unwrap();
    let after_end = console.contents();
    assert!(after_end.ends_with('\n'));

    std::thread::sleep(Duration::from_millis(1500));
    assert_eq!(console.contents(), after_end);
}
