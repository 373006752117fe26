use libtest_mimic::Arguments;
use libtest_mimic::Trial;

mod cases;

pub use utils::*;

fn main() {
    let args = Arguments::from_args();

    let mut tests = Vec::new();

    cases::render::tests(&mut tests);
    cases::lifecycle::tests(&mut tests);
    cases::ticker::tests(&mut tests);
    cases::runner::tests(&mut tests);
    cases::cli::tests(&mut tests);

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let conclusion = libtest_mimic::run(&args, tests);

    TEST_FIXTURE.cleanup();

    conclusion.exit()
}
