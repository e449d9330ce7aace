use std::io;

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default filter when `RUST_LOG` is unset: feed traffic at info, the HTTP
/// stack quieter.
const DEFAULT_FILTER: &str = "info,feed=info,hyper=warn,reqwest=warn";

pub fn configure_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_log = fmt::layer().with_writer(io::stdout).with_filter(filter);

    tracing_subscriber::registry().with(stdout_log).init();
}
