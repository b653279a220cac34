//! ---
//! nsp_section: "03-logging"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Structured logging adapters for scenario runs."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
/// Emit an event at the given level enriched with a [`LogContext`](crate::LogContext).
#[doc(hidden)]
#[macro_export]
macro_rules! __probe_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx: &$crate::LogContext = $ctx;
        tracing::event!(
            $level,
            run = ctx.run.unwrap_or(""),
            context = ctx.context.unwrap_or(""),
            state = ctx.state.unwrap_or(""),
            tag = ctx.tag.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with probe context.
#[macro_export]
macro_rules! probe_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__probe_event!(tracing::Level::INFO, &$ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__probe_event!(tracing::Level::INFO, &$crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with probe context.
#[macro_export]
macro_rules! probe_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__probe_event!(tracing::Level::DEBUG, &$ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__probe_event!(tracing::Level::DEBUG, &$crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with probe context.
#[macro_export]
macro_rules! probe_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__probe_event!(tracing::Level::ERROR, &$ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__probe_event!(tracing::Level::ERROR, &$crate::LogContext::default(), $($arg)+)
    };
}
