// Conditional logging shim: forwards to `tracing` when the feature is enabled,
// compiles to nothing otherwise.

#[cfg(feature = "tracing")]
macro_rules! trace {
  ($($arg:tt)*) => {{
    tracing::trace!($($arg)*);
  }};
}

#[cfg(feature = "tracing")]
macro_rules! debug {
  ($($arg:tt)*) => {{
    tracing::debug!($($arg)*);
  }};
}

#[cfg(feature = "tracing")]
macro_rules! error {
  ($($arg:tt)*) => {{
    tracing::error!($($arg)*);
  }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
  ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
  ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
macro_rules! error {
  ($($arg:tt)*) => {{}};
}

pub(crate) use {debug, error, trace};
